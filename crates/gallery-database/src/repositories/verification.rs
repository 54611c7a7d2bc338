//! Email verification code repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use gallery_core::result::AppResult;
use gallery_entity::user::EmailVerification;

use super::map_db_err;
use crate::store::VerificationStore;

/// Repository for email verification codes.
#[derive(Debug, Clone)]
pub struct VerificationRepository {
    pool: PgPool,
}

impl VerificationRepository {
    /// Create a new verification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VerificationStore for VerificationRepository {
    async fn latest_for_email(&self, email: &str) -> AppResult<Option<EmailVerification>> {
        sqlx::query_as::<_, EmailVerification>(
            "SELECT * FROM email_verifications WHERE email = $1 \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err("Failed to load verification code"))
    }

    async fn insert(
        &self,
        email: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<EmailVerification> {
        sqlx::query_as::<_, EmailVerification>(
            "INSERT INTO email_verifications (email, code, expires_at) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(email)
        .bind(code)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err("Failed to store verification code"))
    }

    async fn mark_verified(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE email_verifications SET is_verified = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_err("Failed to mark code verified"))?;
        Ok(())
    }
}
