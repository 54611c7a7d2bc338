//! Share link entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A time-limited, optionally password-protected link to a set of images.
///
/// The `share_code` is the sole public lookup key and is unique for the
/// lifetime of the system. There is no separate revoked state: revocation
/// rewrites `expire_time` to the revocation instant, so "expired" and
/// "revoked" are the same condition.
///
/// The password is stored and compared in plaintext, mirroring the original
/// system. This is a known weakness of the data contract; it is never
/// serialized into responses.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShareLink {
    /// Unique share link identifier.
    pub id: Uuid,
    /// Opaque 32-hex-character public lookup code. Immutable once assigned.
    pub share_code: String,
    /// Whether a password is required for access. True iff `password` is set.
    pub is_protected: bool,
    /// Optional plaintext access password.
    #[serde(skip_serializing)]
    pub password: Option<String>,
    /// Instant after which the link is inert.
    pub expire_time: DateTime<Utc>,
    /// When the link was created.
    pub created_time: DateTime<Utc>,
}

impl ShareLink {
    /// Whether the link is expired at the given instant.
    ///
    /// A link whose expiry equals the current instant is already expired;
    /// this is what makes revocation (expiry := now) immediate.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expire_time <= now
    }

    /// Whether the supplied password grants access to a protected link.
    pub fn password_matches(&self, supplied: Option<&str>) -> bool {
        password_matches(self.password.as_deref(), supplied)
    }
}

/// Exact, case-sensitive comparison; a missing password never matches a
/// protected link.
fn password_matches(stored: Option<&str>, supplied: Option<&str>) -> bool {
    match (stored, supplied) {
        (Some(stored), Some(given)) => stored == given,
        (Some(_), None) => false,
        // Unprotected links accept anything.
        (None, _) => true,
    }
}

/// A share link together with its associated image ids, as returned by the
/// management listing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShareLinkWithImages {
    /// Unique share link identifier.
    pub id: Uuid,
    /// Public lookup code.
    pub share_code: String,
    /// Whether a password is required for access.
    pub is_protected: bool,
    /// Optional plaintext access password.
    #[serde(skip_serializing)]
    pub password: Option<String>,
    /// Instant after which the link is inert.
    pub expire_time: DateTime<Utc>,
    /// When the link was created.
    pub created_time: DateTime<Utc>,
    /// Ids of the images this link exposes.
    pub image_ids: Vec<Uuid>,
}

impl ShareLinkWithImages {
    /// Whether the link is expired at the given instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expire_time <= now
    }

    /// Whether the supplied password grants access to a protected link.
    pub fn password_matches(&self, supplied: Option<&str>) -> bool {
        password_matches(self.password.as_deref(), supplied)
    }
}

/// Data required to persist a new share link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShareLink {
    /// Pre-generated unique share code.
    pub share_code: String,
    /// Whether the link is password protected.
    pub is_protected: bool,
    /// Plaintext password (`None` when unprotected).
    pub password: Option<String>,
    /// Resolved expiry instant.
    pub expire_time: DateTime<Utc>,
    /// Images to associate (at least one).
    pub image_ids: Vec<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn link(password: Option<&str>, expire: DateTime<Utc>) -> ShareLink {
        ShareLink {
            id: Uuid::new_v4(),
            share_code: "a".repeat(32),
            is_protected: password.is_some(),
            password: password.map(String::from),
            expire_time: expire,
            created_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert!(link(None, now).is_expired_at(now));
        assert!(!link(None, now + chrono::Duration::seconds(1)).is_expired_at(now));
    }

    #[test]
    fn test_password_comparison_is_case_sensitive() {
        let now = Utc::now();
        let l = link(Some("Secret"), now + chrono::Duration::hours(1));
        assert!(l.password_matches(Some("Secret")));
        assert!(!l.password_matches(Some("secret")));
        assert!(!l.password_matches(None));
    }

    #[test]
    fn test_password_never_serialized() {
        let now = Utc::now();
        let l = link(Some("topsecret"), now + chrono::Duration::hours(1));
        let json = serde_json::to_string(&l).unwrap();
        assert!(!json.contains("topsecret"));
        assert!(!json.contains("password"));
    }
}
