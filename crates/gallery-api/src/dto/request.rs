//! Request body and query DTOs.

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use gallery_core::error::AppError;
use gallery_core::result::AppResult;

/// Body of `POST /api/images/share`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateShareLinkDto {
    /// Images to expose through the link.
    #[validate(length(min = 1, message = "At least one image is required"))]
    pub image_ids: Vec<Uuid>,
    /// Optional access password. Empty string means unprotected.
    pub password: Option<String>,
    /// Relative lifetime in minutes. Wins over `expire_time`.
    pub duration_minutes: Option<i64>,
    /// Explicit expiry timestamp (RFC 3339, or naive taken as UTC).
    pub expire_time: Option<String>,
}

/// Body of the bulk revoke and bulk delete share endpoints.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ShareCodesDto {
    #[validate(length(min = 1, message = "At least one share code is required"))]
    pub share_codes: Vec<String>,
}

/// Query of `GET /api/share/{code}`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessShareQuery {
    /// Password for protected links.
    pub password: Option<String>,
}

/// Query of `GET /api/images`.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageListQuery {
    /// Case-insensitive title substring filter.
    pub keyword: Option<String>,
    /// Comma-separated tag ids; images must carry at least one.
    pub tags: Option<String>,
}

impl ImageListQuery {
    pub fn tag_ids(&self) -> AppResult<Vec<Uuid>> {
        parse_uuid_list(self.tags.as_deref())
    }
}

/// Body of `PUT`/`PATCH /api/images/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateImageDto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tag_ids: Option<Vec<Uuid>>,
}

/// Body of `POST /api/images/bulk-delete`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BulkDeleteImagesDto {
    #[validate(length(min = 1, message = "At least one image id is required"))]
    pub image_ids: Vec<Uuid>,
}

/// Body of `POST /api/tags`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTagDto {
    #[validate(length(min = 1, max = 100, message = "Tag name must be 1-100 characters"))]
    pub name: String,
}

/// Body of `POST /api/users/send-verification-code`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendCodeDto {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// Body of `POST /api/users/register`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterDto {
    #[validate(length(min = 3, max = 150, message = "Username must be 3-150 characters"))]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    /// Emailed verification code.
    #[validate(length(equal = 6, message = "Verification code must be 6 digits"))]
    pub code: String,
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginDto {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    pub captcha_key: String,
    pub captcha_value: String,
}

/// Body of `POST /api/auth/refresh` and `POST /api/auth/logout`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RefreshTokenDto {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Body of `PUT /api/users/profile`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileDto {
    pub store_name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
}

/// Parses a comma-separated uuid list, ignoring empty segments.
pub fn parse_uuid_list(raw: Option<&str>) -> AppResult<Vec<Uuid>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Uuid::parse_str(s).map_err(|_| AppError::validation(format!("Invalid uuid: {s}")))
        })
        .collect()
}
