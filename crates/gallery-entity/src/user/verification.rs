//! Email verification code model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A pending or consumed email verification code.
///
/// One row per email address; resending replaces the code in place.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmailVerification {
    /// Row identifier.
    pub id: Uuid,
    /// Address the code was sent to.
    pub email: String,
    /// Six-digit numeric code.
    pub code: String,
    /// Whether the code has already been consumed by a registration.
    pub is_verified: bool,
    /// When the code was (re-)issued.
    pub created_at: DateTime<Utc>,
    /// Instant after which the code is rejected.
    pub expires_at: DateTime<Utc>,
}

impl EmailVerification {
    /// Whether the code has expired at the given instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}
