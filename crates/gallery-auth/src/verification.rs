//! Email verification codes for account registration.

use async_trait::async_trait;
use rand::Rng;
use tracing::info;

use gallery_core::result::AppResult;
use gallery_core::traits::mailer::Mailer;

/// Number of digits in a verification code.
const CODE_LENGTH: u32 = 6;

/// Generates a random numeric verification code, zero-padded to six digits.
pub fn generate_verification_code() -> String {
    let max = 10u32.pow(CODE_LENGTH);
    let n = rand::rng().random_range(0..max);
    format!("{n:06}")
}

/// Mailer that writes messages to the application log instead of sending.
///
/// Used in development and tests where no SMTP relay is available.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        info!(to, subject, body, "Outgoing mail (log transport)");
        Ok(())
    }
}
