//! Share link repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use gallery_core::result::AppResult;
use gallery_core::types::pagination::{PageRequest, PageResponse};
use gallery_entity::share::{CreateShareLink, ShareLink, ShareLinkWithImages};

use super::{map_db_err, map_insert_err};
use crate::store::ShareStore;

/// Condition tying a share link row (aliased `sl`) to an owning user.
///
/// Ownership is transitive through the associated images; there is no
/// creator column on the link itself.
const OWNED: &str = "EXISTS (
        SELECT 1 FROM share_link_images sli
        JOIN images i ON i.id = sli.image_id
        WHERE sli.share_link_id = sl.id AND i.uploaded_by = $OWNER
    )";

/// Repository for share link persistence.
#[derive(Debug, Clone)]
pub struct ShareRepository {
    pool: PgPool,
}

impl ShareRepository {
    /// Create a new share repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareStore for ShareRepository {
    async fn code_exists(&self, share_code: &str) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM share_links WHERE share_code = $1)",
        )
        .bind(share_code)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err("Failed to check share code"))
    }

    async fn insert(&self, data: &CreateShareLink) -> AppResult<ShareLink> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(map_db_err("Failed to begin transaction"))?;

        let link = sqlx::query_as::<_, ShareLink>(
            "INSERT INTO share_links (share_code, is_protected, password, expire_time) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&data.share_code)
        .bind(data.is_protected)
        .bind(&data.password)
        .bind(data.expire_time)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            map_insert_err(e, "Share code already in use", "Failed to create share link")
        })?;

        sqlx::query(
            "INSERT INTO share_link_images (share_link_id, image_id) \
             SELECT $1, unnest($2::uuid[])",
        )
        .bind(link.id)
        .bind(&data.image_ids)
        .execute(&mut *tx)
        .await
        .map_err(map_db_err("Failed to associate images with share link"))?;

        tx.commit()
            .await
            .map_err(map_db_err("Failed to commit share link"))?;

        Ok(link)
    }

    async fn find_by_code(&self, share_code: &str) -> AppResult<Option<ShareLinkWithImages>> {
        sqlx::query_as::<_, ShareLinkWithImages>(
            "SELECT sl.*, \
             ARRAY(SELECT image_id FROM share_link_images WHERE share_link_id = sl.id) AS image_ids \
             FROM share_links sl WHERE sl.share_code = $1",
        )
        .bind(share_code)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err("Failed to find share link by code"))
    }

    async fn list_owned(
        &self,
        owner: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareLinkWithImages>> {
        let owned = OWNED.replace("$OWNER", "$1");

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM share_links sl WHERE {owned}"
        ))
        .bind(owner)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err("Failed to count share links"))?;

        let links = sqlx::query_as::<_, ShareLinkWithImages>(&format!(
            "SELECT sl.*, \
             ARRAY(SELECT image_id FROM share_link_images WHERE share_link_id = sl.id) AS image_ids \
             FROM share_links sl WHERE {owned} \
             ORDER BY sl.expire_time DESC, sl.created_time ASC \
             LIMIT $2 OFFSET $3"
        ))
        .bind(owner)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err("Failed to list share links"))?;

        Ok(PageResponse::new(
            links,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn revoke_owned(
        &self,
        share_codes: &[String],
        owner: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let owned = OWNED.replace("$OWNER", "$2");

        // Single statement, so a bulk revoke is all-or-nothing.
        let result = sqlx::query(&format!(
            "UPDATE share_links sl SET expire_time = $3 \
             WHERE sl.share_code = ANY($1) AND sl.expire_time > $3 AND {owned}"
        ))
        .bind(share_codes)
        .bind(owner)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_db_err("Failed to revoke share links"))?;

        Ok(result.rows_affected())
    }

    async fn delete_owned(&self, share_codes: &[String], owner: Uuid) -> AppResult<u64> {
        let owned = OWNED.replace("$OWNER", "$2");

        let result = sqlx::query(&format!(
            "DELETE FROM share_links sl \
             WHERE sl.share_code = ANY($1) AND {owned}"
        ))
        .bind(share_codes)
        .bind(owner)
        .execute(&self.pool)
        .await
        .map_err(map_db_err("Failed to delete share links"))?;

        Ok(result.rows_affected())
    }
}
