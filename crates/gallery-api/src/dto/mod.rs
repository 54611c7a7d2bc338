//! Request and response DTOs.

pub mod request;
pub mod response;

use validator::Validate;

use gallery_core::error::AppError;
use gallery_core::result::AppResult;

/// Runs validator-derive checks, mapping failures to a validation error.
pub fn validated<T: Validate>(value: T) -> AppResult<T> {
    value
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    Ok(value)
}
