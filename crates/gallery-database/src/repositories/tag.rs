//! Tag repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use gallery_core::result::AppResult;
use gallery_entity::tag::Tag;

use super::{map_db_err, map_insert_err};
use crate::store::TagStore;

/// Repository for tag persistence.
#[derive(Debug, Clone)]
pub struct TagRepository {
    pool: PgPool,
}

impl TagRepository {
    /// Create a new tag repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagStore for TagRepository {
    async fn insert(&self, owner: Uuid, name: &str) -> AppResult<Tag> {
        sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (name, uploaded_by) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(owner)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_err(e, "Tag already exists", "Failed to create tag"))
    }

    async fn list_owned(&self, owner: Uuid) -> AppResult<Vec<Tag>> {
        sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE uploaded_by = $1 ORDER BY name")
            .bind(owner)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_err("Failed to list tags"))
    }

    async fn filter_owned_ids(&self, ids: &[Uuid], owner: Uuid) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM tags WHERE id = ANY($1) AND uploaded_by = $2",
        )
        .bind(ids)
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err("Failed to filter tags"))
    }
}
