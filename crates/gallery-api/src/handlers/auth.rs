//! Authentication endpoints: login, token refresh, logout.

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use serde_json::json;

use gallery_service::user::LoginRequest;

use crate::dto::request::{LoginDto, RefreshTokenDto};
use crate::dto::response::RefreshResponse;
use crate::dto::validated;
use crate::error::ApiError;
use crate::state::AppState;

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginDto>,
) -> Result<impl IntoResponse, ApiError> {
    let body = validated(body)?;
    let response = state
        .users
        .login(LoginRequest {
            username: body.username,
            password: body.password,
            captcha_key: body.captcha_key,
            captcha_value: body.captcha_value,
        })
        .await?;
    Ok(Json(json!({ "success": true, "data": response })))
}

/// `POST /api/auth/refresh`
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshTokenDto>,
) -> Result<impl IntoResponse, ApiError> {
    let body = validated(body)?;
    let (access_token, access_expires_at) = state.users.refresh(&body.refresh_token).await?;
    Ok(Json(json!({
        "success": true,
        "data": RefreshResponse { access_token, access_expires_at },
    })))
}

/// `POST /api/auth/logout`
///
/// Blocklists the refresh token for its remaining lifetime.
pub async fn logout(
    State(state): State<AppState>,
    Json(body): Json<RefreshTokenDto>,
) -> Result<impl IntoResponse, ApiError> {
    let body = validated(body)?;
    state.users.logout(&body.refresh_token).await?;
    Ok(Json(json!({ "success": true, "data": null })))
}
