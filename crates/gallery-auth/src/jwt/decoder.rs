//! JWT token validation and blocklist checking.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use uuid::Uuid;

use gallery_cache::keys;
use gallery_core::config::auth::AuthConfig;
use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_core::traits::cache::CacheProvider;

use super::claims::{Claims, TokenType};

/// Validates JWT tokens and checks blocklist status.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
    /// Cache used for blocklist lookups.
    cache: Arc<dyn CacheProvider>,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig, cache: Arc<dyn CacheProvider>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // seconds of clock skew tolerance

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            cache,
        }
    }

    /// Decodes and validates an access token string.
    ///
    /// Checks signature, expiration, token type, and the jti blocklist.
    pub async fn decode_access_token(&self, token: &str) -> AppResult<Claims> {
        let claims = self.decode_token(token)?;

        if claims.token_type != TokenType::Access {
            return Err(AppError::authentication(
                "Invalid token type: expected access token",
            ));
        }

        self.check_blocklist(&claims.jti).await?;

        Ok(claims)
    }

    /// Decodes and validates a refresh token string.
    pub async fn decode_refresh_token(&self, token: &str) -> AppResult<Claims> {
        let claims = self.decode_token(token)?;

        if claims.token_type != TokenType::Refresh {
            return Err(AppError::authentication(
                "Invalid token type: expected refresh token",
            ));
        }

        self.check_blocklist(&claims.jti).await?;

        Ok(claims)
    }

    /// Internal decode without type checking.
    fn decode_token(&self, token: &str) -> AppResult<Claims> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::authentication("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::authentication("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::authentication("Invalid token signature")
                    }
                    _ => AppError::authentication(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Checks whether the given JWT ID has been blocklisted.
    async fn check_blocklist(&self, jti: &Uuid) -> AppResult<()> {
        let key = keys::jwt_blocklist(&jti.to_string());
        let blocked = self.cache.get(&key).await.ok().flatten();
        if blocked.is_some() {
            return Err(AppError::authentication("Token has been revoked"));
        }
        Ok(())
    }

    /// Adds a JWT ID to the blocklist for the remaining token lifetime.
    pub async fn blocklist_token(
        &self,
        jti: Uuid,
        remaining_ttl_seconds: u64,
    ) -> AppResult<()> {
        let key = keys::jwt_blocklist(&jti.to_string());
        // Minimum 60 seconds so a token expiring mid-request stays blocked.
        let ttl = Duration::from_secs(remaining_ttl_seconds.max(60));
        self.cache.set(&key, "revoked", ttl).await?;
        Ok(())
    }
}
