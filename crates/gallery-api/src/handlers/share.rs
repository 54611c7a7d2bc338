//! Share link endpoints: creation, management, and the public access gate.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::info;

use gallery_service::share::CreateShareLinkRequest;

use crate::dto::request::{AccessShareQuery, CreateShareLinkDto, ShareCodesDto};
use crate::dto::validated;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// `POST /api/images/share`
pub async fn create_share_link(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateShareLinkDto>,
) -> Result<impl IntoResponse, ApiError> {
    let body = validated(body)?;
    let link = state
        .shares
        .create(
            &auth,
            CreateShareLinkRequest {
                image_ids: body.image_ids,
                password: body.password,
                duration_minutes: body.duration_minutes,
                expire_time: body.expire_time,
            },
        )
        .await?;

    info!(user_id = %auth.user_id, share_code = %link.share_code, "Share link created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": link })),
    ))
}

/// `GET /api/images/share/manage`
pub async fn list_share_links(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let page = state
        .shares
        .list(&auth, pagination.to_page_request())
        .await?;
    Ok(Json(json!({ "success": true, "data": page })))
}

/// `POST /api/images/share/manage/delete`
///
/// Revokes links by expiring them immediately. Rows are kept.
pub async fn revoke_share_links(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ShareCodesDto>,
) -> Result<impl IntoResponse, ApiError> {
    let body = validated(body)?;
    let revoked = state.shares.revoke(&auth, body.share_codes).await?;
    Ok(Json(
        json!({ "success": true, "data": { "revoked": revoked } }),
    ))
}

/// `DELETE /api/images/share/manage/delete`
///
/// Permanently removes links, expired or not. Images are untouched.
pub async fn delete_share_links(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ShareCodesDto>,
) -> Result<impl IntoResponse, ApiError> {
    let body = validated(body)?;
    state.shares.delete(&auth, body.share_codes).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/share/{code}`
///
/// Public, unauthenticated. Protected links take the password as a query
/// parameter.
pub async fn access_share(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(query): Query<AccessShareQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let share = state
        .share_access
        .access(&code, query.password.as_deref())
        .await?;
    Ok(Json(json!({ "success": true, "data": share })))
}
