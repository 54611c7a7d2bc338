//! Account endpoints: registration flow, captcha, profile.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use gallery_service::user::RegisterRequest;

use crate::dto::request::{RegisterDto, SendCodeDto, UpdateProfileDto};
use crate::dto::response::CaptchaResponse;
use crate::dto::validated;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// `POST /api/users/send-verification-code`
pub async fn send_verification_code(
    State(state): State<AppState>,
    Json(body): Json<SendCodeDto>,
) -> Result<impl IntoResponse, ApiError> {
    let body = validated(body)?;
    state.users.send_verification_code(&body.email).await?;
    Ok(Json(json!({ "success": true, "data": null })))
}

/// `POST /api/users/register`
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterDto>,
) -> Result<impl IntoResponse, ApiError> {
    let body = validated(body)?;
    let user = state
        .users
        .register(RegisterRequest {
            username: body.username,
            email: body.email,
            password: body.password,
            confirm_password: body.confirm_password,
            code: body.code,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": user })),
    ))
}

/// `GET /api/users/captcha`
pub async fn captcha(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let challenge = state.users.issue_captcha().await?;
    Ok(Json(json!({
        "success": true,
        "data": CaptchaResponse {
            captcha_key: challenge.captcha_key,
            captcha_image: challenge.image,
        },
    })))
}

/// `GET /api/users/profile`
pub async fn profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.users.profile(&auth).await?;
    Ok(Json(json!({ "success": true, "data": user })))
}

/// `PUT /api/users/profile`
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<UpdateProfileDto>,
) -> Result<impl IntoResponse, ApiError> {
    let body = validated(body)?;
    let user = state
        .users
        .update_profile(&auth, body.store_name.as_deref(), body.email.as_deref())
        .await?;
    Ok(Json(json!({ "success": true, "data": user })))
}
