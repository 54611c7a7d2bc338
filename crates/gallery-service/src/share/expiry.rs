//! Expiry resolution for new share links.

use chrono::{DateTime, NaiveDateTime, Utc};

use gallery_core::error::AppError;
use gallery_core::result::AppResult;

/// Fallback lifetime when the client specifies nothing.
const DEFAULT_LIFETIME_HOURS: i64 = 24;

/// Accepted layout for expiry timestamps without an offset, taken as UTC.
const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Resolve the expiry instant for a new share link.
///
/// A relative duration wins over an explicit timestamp when both are given.
/// The duration must be strictly positive; an explicit timestamp must parse
/// (RFC 3339, or naive `%Y-%m-%dT%H:%M:%S` taken as UTC) and lie strictly in
/// the future. With neither, the link lives for 24 hours.
pub fn resolve_expiry(
    now: DateTime<Utc>,
    duration_minutes: Option<i64>,
    expire_time: Option<&str>,
) -> AppResult<DateTime<Utc>> {
    if let Some(minutes) = duration_minutes {
        if minutes <= 0 {
            return Err(AppError::validation(
                "duration_minutes must be a positive integer",
            ));
        }
        return Ok(now + chrono::Duration::minutes(minutes));
    }

    if let Some(raw) = expire_time {
        let parsed = parse_expire_time(raw)?;
        if parsed <= now {
            return Err(AppError::validation("expire_time must be in the future"));
        }
        return Ok(parsed);
    }

    Ok(now + chrono::Duration::hours(DEFAULT_LIFETIME_HOURS))
}

fn parse_expire_time(raw: &str) -> AppResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, NAIVE_FORMAT) {
        return Ok(naive.and_utc());
    }
    Err(AppError::validation(format!(
        "Invalid expire_time: '{raw}'"
    )))
}
