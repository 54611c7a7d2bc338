//! Response body DTOs.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Captcha challenge handed to the login form.
#[derive(Debug, Clone, Serialize)]
pub struct CaptchaResponse {
    pub captcha_key: String,
    /// Data URI the client can render inline.
    pub captcha_image: String,
}

/// New access token from `POST /api/auth/refresh`.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub access_expires_at: DateTime<Utc>,
}
