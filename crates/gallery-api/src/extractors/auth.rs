//! Authentication extractor.
//!
//! Pulls the bearer token from the `Authorization` header, validates it,
//! and exposes the resulting [`RequestContext`] to handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use gallery_core::error::AppError;
use gallery_service::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extractor that requires a valid access token.
///
/// Dereferences to [`RequestContext`], so handlers can pass `&auth` straight
/// to the service layer.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = state.jwt_decoder.decode_access_token(token).await?;
        Ok(AuthUser(RequestContext::new(
            claims.user_id(),
            claims.user_type,
            claims.username,
        )))
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::authentication("Missing authorization header"))?;

    header
        .strip_prefix("Bearer ")
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::authentication("Invalid authorization header"))
}
