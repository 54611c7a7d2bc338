//! Image repository.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use gallery_core::result::AppResult;
use gallery_core::types::pagination::{PageRequest, PageResponse};
use gallery_entity::image::{CreateImage, Image, ImageWithTags};

use super::map_db_err;
use crate::store::{ImageFilter, ImageStore, UpdateImage};

/// SQL fragment aggregating an image's tag ids.
const TAG_IDS: &str = "ARRAY(SELECT tag_id FROM image_tags WHERE image_id = i.id) AS tag_ids";

/// Repository for image persistence.
#[derive(Debug, Clone)]
pub struct ImageRepository {
    pool: PgPool,
}

impl ImageRepository {
    /// Create a new image repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_with_tags(&self, id: Uuid) -> AppResult<Option<ImageWithTags>> {
        sqlx::query_as::<_, ImageWithTags>(&format!(
            "SELECT i.*, {TAG_IDS} FROM images i WHERE i.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err("Failed to load image"))
    }
}

#[async_trait]
impl ImageStore for ImageRepository {
    async fn insert(&self, data: &CreateImage) -> AppResult<ImageWithTags> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(map_db_err("Failed to begin transaction"))?;

        let image = sqlx::query_as::<_, Image>(
            "INSERT INTO images (title, description, file_path, uploaded_by) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.file_path)
        .bind(data.uploaded_by)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_err("Failed to create image"))?;

        if !data.tag_ids.is_empty() {
            sqlx::query(
                "INSERT INTO image_tags (image_id, tag_id) SELECT $1, unnest($2::uuid[])",
            )
            .bind(image.id)
            .bind(&data.tag_ids)
            .execute(&mut *tx)
            .await
            .map_err(map_db_err("Failed to tag image"))?;
        }

        tx.commit()
            .await
            .map_err(map_db_err("Failed to commit image"))?;

        Ok(ImageWithTags {
            id: image.id,
            title: image.title,
            description: image.description,
            file_path: image.file_path,
            uploaded_by: image.uploaded_by,
            created_at: image.created_at,
            tag_ids: data.tag_ids.clone(),
        })
    }

    async fn find_owned(&self, id: Uuid, owner: Uuid) -> AppResult<Option<ImageWithTags>> {
        sqlx::query_as::<_, ImageWithTags>(&format!(
            "SELECT i.*, {TAG_IDS} FROM images i WHERE i.id = $1 AND i.uploaded_by = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_err("Failed to find image"))
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Image>> {
        sqlx::query_as::<_, Image>(
            "SELECT * FROM images WHERE id = ANY($1) ORDER BY created_at DESC",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err("Failed to fetch images"))
    }

    async fn count_by_ids(&self, ids: &[Uuid]) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM images WHERE id = ANY($1)")
            .bind(ids)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_err("Failed to count images"))?;
        Ok(count as u64)
    }

    async fn count_owned_by_ids(&self, ids: &[Uuid], owner: Uuid) -> AppResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM images WHERE id = ANY($1) AND uploaded_by = $2",
        )
        .bind(ids)
        .bind(owner)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err("Failed to count images"))?;
        Ok(count as u64)
    }

    async fn list_owned(
        &self,
        owner: Uuid,
        filter: &ImageFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ImageWithTags>> {
        // Both filters are optional; NULL/empty bindings disable them.
        let condition = "i.uploaded_by = $1 \
             AND ($2::text IS NULL OR i.title ILIKE '%' || $2 || '%') \
             AND (cardinality($3::uuid[]) = 0 OR EXISTS ( \
                 SELECT 1 FROM image_tags it \
                 WHERE it.image_id = i.id AND it.tag_id = ANY($3)))";

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM images i WHERE {condition}"
        ))
        .bind(owner)
        .bind(&filter.keyword)
        .bind(&filter.tag_ids)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err("Failed to count images"))?;

        let images = sqlx::query_as::<_, ImageWithTags>(&format!(
            "SELECT i.*, {TAG_IDS} FROM images i WHERE {condition} \
             ORDER BY i.created_at DESC LIMIT $4 OFFSET $5"
        ))
        .bind(owner)
        .bind(&filter.keyword)
        .bind(&filter.tag_ids)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err("Failed to list images"))?;

        Ok(PageResponse::new(
            images,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        update: &UpdateImage,
    ) -> AppResult<Option<ImageWithTags>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(map_db_err("Failed to begin transaction"))?;

        let updated = sqlx::query_scalar::<_, Uuid>(
            "UPDATE images SET \
             title = COALESCE($3, title), \
             description = COALESCE($4, description) \
             WHERE id = $1 AND uploaded_by = $2 RETURNING id",
        )
        .bind(id)
        .bind(owner)
        .bind(&update.title)
        .bind(&update.description)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_err("Failed to update image"))?;

        if updated.is_none() {
            return Ok(None);
        }

        if let Some(tag_ids) = &update.tag_ids {
            sqlx::query("DELETE FROM image_tags WHERE image_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(map_db_err("Failed to clear image tags"))?;

            if !tag_ids.is_empty() {
                sqlx::query(
                    "INSERT INTO image_tags (image_id, tag_id) SELECT $1, unnest($2::uuid[])",
                )
                .bind(id)
                .bind(tag_ids)
                .execute(&mut *tx)
                .await
                .map_err(map_db_err("Failed to tag image"))?;
            }
        }

        tx.commit()
            .await
            .map_err(map_db_err("Failed to commit image update"))?;

        self.fetch_with_tags(id).await
    }

    async fn delete_owned_by_ids(&self, ids: &[Uuid], owner: Uuid) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            "DELETE FROM images WHERE id = ANY($1) AND uploaded_by = $2 RETURNING file_path",
        )
        .bind(ids)
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err("Failed to delete images"))
    }
}
