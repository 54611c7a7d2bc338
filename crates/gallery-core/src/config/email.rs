//! Verification email configuration.

use serde::{Deserialize, Serialize};

/// Settings for the email verification flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Sender address used in outgoing mail.
    #[serde(default = "default_from")]
    pub from_address: String,
    /// How long a verification code stays valid, in minutes.
    #[serde(default = "default_code_expire")]
    pub code_expire_minutes: u64,
    /// Minimum interval between two codes for the same address, in seconds.
    #[serde(default = "default_resend_interval")]
    pub resend_interval_seconds: u64,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            from_address: default_from(),
            code_expire_minutes: default_code_expire(),
            resend_interval_seconds: default_resend_interval(),
        }
    }
}

fn default_from() -> String {
    "noreply@sugallery.local".to_string()
}

fn default_code_expire() -> u64 {
    10
}

fn default_resend_interval() -> u64 {
    60
}
