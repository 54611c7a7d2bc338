//! Captcha rendering collaborator boundary.
//!
//! Challenge generation and verification live in `gallery-auth`; turning the
//! challenge text into a picture is a presentation concern behind this trait.

use crate::result::AppResult;

/// Renders a captcha challenge into a data URI for the client.
pub trait CaptchaRenderer: Send + Sync + std::fmt::Debug + 'static {
    /// Render the challenge text. Returns a `data:` URI string.
    fn render(&self, code: &str) -> AppResult<String>;
}
