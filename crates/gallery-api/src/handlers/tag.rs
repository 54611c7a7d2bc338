//! Tag endpoints.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use crate::dto::request::CreateTagDto;
use crate::dto::validated;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// `GET /api/tags`
pub async fn list_tags(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let tags = state.tags.list(&auth).await?;
    Ok(Json(json!({ "success": true, "data": tags })))
}

/// `POST /api/tags`
pub async fn create_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateTagDto>,
) -> Result<impl IntoResponse, ApiError> {
    let body = validated(body)?;
    let tag = state.tags.create(&auth, &body.name).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": tag })),
    ))
}
