//! Captcha challenge generation and verification.
//!
//! A challenge is a short random string from an unambiguous uppercase
//! alphanumeric alphabet. The expected answer lives in the cache under an
//! opaque key; verification is case-insensitive and consumes the challenge
//! whether or not the answer matched.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::Rng;
use uuid::Uuid;

use gallery_cache::keys;
use gallery_core::config::auth::AuthConfig;
use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_core::traits::cache::CacheProvider;
use gallery_core::traits::captcha::CaptchaRenderer;

/// Characters a challenge is drawn from.
const CAPTCHA_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A freshly issued captcha challenge.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CaptchaChallenge {
    /// Opaque key the client echoes back on login.
    pub captcha_key: String,
    /// Rendered challenge as a `data:` URI.
    pub image: String,
}

/// Issues and verifies captcha challenges.
#[derive(Debug, Clone)]
pub struct CaptchaService {
    cache: Arc<dyn CacheProvider>,
    renderer: Arc<dyn CaptchaRenderer>,
    /// Challenge length in characters.
    length: usize,
    /// How long a challenge stays answerable.
    ttl: Duration,
}

impl CaptchaService {
    /// Creates a new captcha service from auth configuration.
    pub fn new(
        config: &AuthConfig,
        cache: Arc<dyn CacheProvider>,
        renderer: Arc<dyn CaptchaRenderer>,
    ) -> Self {
        Self {
            cache,
            renderer,
            length: config.captcha_length,
            ttl: Duration::from_secs(config.captcha_ttl_seconds),
        }
    }

    /// Issues a new challenge and stores the expected answer.
    pub async fn issue(&self) -> AppResult<CaptchaChallenge> {
        let code = generate_code(self.length);
        let captcha_key = Uuid::new_v4().simple().to_string();

        self.cache
            .set(&keys::captcha(&captcha_key), &code, self.ttl)
            .await?;

        let image = self.renderer.render(&code)?;

        Ok(CaptchaChallenge { captcha_key, image })
    }

    /// Verifies an answer against the stored challenge.
    ///
    /// The challenge is deleted on every attempt, so a wrong answer forces
    /// the client to request a fresh one. Expired or unknown keys fail.
    pub async fn verify(&self, captcha_key: &str, answer: &str) -> AppResult<()> {
        let key = keys::captcha(captcha_key);
        let expected = self.cache.get(&key).await?;
        self.cache.delete(&key).await?;

        match expected {
            Some(code) if code.eq_ignore_ascii_case(answer.trim()) => Ok(()),
            Some(_) => Err(AppError::validation("Incorrect captcha answer")),
            None => Err(AppError::validation("Captcha expired or invalid")),
        }
    }
}

/// Generates a random challenge string.
fn generate_code(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| CAPTCHA_CHARSET[rng.random_range(0..CAPTCHA_CHARSET.len())] as char)
        .collect()
}

/// Renderer that embeds the challenge text itself in the data URI.
///
/// Stands in for a drawing backend in development and tests.
#[derive(Debug, Clone, Default)]
pub struct PlainTextRenderer;

impl CaptchaRenderer for PlainTextRenderer {
    fn render(&self, code: &str) -> AppResult<String> {
        Ok(format!("data:text/plain;base64,{}", STANDARD.encode(code)))
    }
}
