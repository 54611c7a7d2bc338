//! Cache key construction helpers.
//!
//! Keeping key formats in one place avoids prefix collisions between
//! subsystems sharing the cache.

/// Key for a stored captcha challenge.
pub fn captcha(captcha_key: &str) -> String {
    format!("captcha:{captcha_key}")
}

/// Key for a blocklisted JWT id.
pub fn jwt_blocklist(jti: &str) -> String {
    format!("jwt:blocklist:{jti}")
}
