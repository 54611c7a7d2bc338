//! Mail transport collaborator boundary.
//!
//! Actual delivery (SMTP, provider APIs) is a deployment concern; the
//! application only depends on this trait.

use async_trait::async_trait;

use crate::result::AppResult;

/// Sends application email.
#[async_trait]
pub trait Mailer: Send + Sync + std::fmt::Debug + 'static {
    /// Deliver a plain-text message to a single recipient.
    async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()>;
}
