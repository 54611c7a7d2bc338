//! Image service: upload, listing, editing, bulk delete.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_core::traits::storage::FileStore;
use gallery_core::types::pagination::{PageRequest, PageResponse};
use gallery_database::store::{ImageFilter, ImageStore, TagStore, UpdateImage};
use gallery_entity::image::{CreateImage, ImageWithTags};

use crate::context::RequestContext;

/// One file in an upload batch.
#[derive(Debug, Clone)]
pub struct UploadImageRequest {
    /// Client-supplied file name.
    pub file_name: String,
    /// Raw image bytes.
    pub data: Bytes,
    /// Display title; defaults to the file name when empty.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
}

/// Edits to an existing image.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct UpdateImageRequest {
    /// New title, if changing.
    pub title: Option<String>,
    /// New description, if changing.
    pub description: Option<String>,
    /// Full replacement tag set, if changing. Tags the requester does not
    /// own are dropped.
    pub tag_ids: Option<Vec<Uuid>>,
}

/// Manages a user's uploaded images.
#[derive(Debug, Clone)]
pub struct ImageService {
    images: Arc<dyn ImageStore>,
    tags: Arc<dyn TagStore>,
    files: Arc<dyn FileStore>,
}

impl ImageService {
    /// Creates a new image service.
    pub fn new(
        images: Arc<dyn ImageStore>,
        tags: Arc<dyn TagStore>,
        files: Arc<dyn FileStore>,
    ) -> Self {
        Self {
            images,
            tags,
            files,
        }
    }

    /// Uploads a batch of images, all tagged with the same (owned) tags.
    ///
    /// Tag ids the requester does not own are dropped silently rather than
    /// failing the whole batch.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        uploads: Vec<UploadImageRequest>,
        tag_ids: Vec<Uuid>,
    ) -> AppResult<Vec<ImageWithTags>> {
        if uploads.is_empty() {
            return Err(AppError::validation("No files supplied"));
        }

        let tag_ids = self.tags.filter_owned_ids(&tag_ids, ctx.user_id).await?;

        let mut created = Vec::with_capacity(uploads.len());
        for upload in uploads {
            let file_path = self.files.save(&upload.file_name, upload.data).await?;
            let title = if upload.title.is_empty() {
                upload.file_name.clone()
            } else {
                upload.title.clone()
            };
            let image = self
                .images
                .insert(&CreateImage {
                    title,
                    description: upload.description.clone(),
                    file_path,
                    uploaded_by: ctx.user_id,
                    tag_ids: tag_ids.clone(),
                })
                .await?;
            created.push(image);
        }

        info!(user_id = %ctx.user_id, count = created.len(), "Uploaded images");
        Ok(created)
    }

    /// Lists the requester's images, newest first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        keyword: Option<String>,
        tag_ids: Vec<Uuid>,
        page: PageRequest,
    ) -> AppResult<PageResponse<ImageWithTags>> {
        let filter = ImageFilter {
            keyword: keyword.filter(|k| !k.is_empty()),
            tag_ids: dedup(tag_ids),
        };
        self.images.list_owned(ctx.user_id, &filter, &page).await
    }

    /// Fetches one of the requester's images.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> AppResult<ImageWithTags> {
        self.images
            .find_owned(id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Image not found"))
    }

    /// Edits one of the requester's images.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        req: UpdateImageRequest,
    ) -> AppResult<ImageWithTags> {
        let tag_ids = match req.tag_ids {
            Some(ids) => Some(self.tags.filter_owned_ids(&ids, ctx.user_id).await?),
            None => None,
        };

        self.images
            .update_owned(
                id,
                ctx.user_id,
                &UpdateImage {
                    title: req.title,
                    description: req.description,
                    tag_ids,
                },
            )
            .await?
            .ok_or_else(|| AppError::not_found("Image not found"))
    }

    /// Deletes a batch of the requester's images, rows first, then files.
    ///
    /// Every id must refer to an image the requester owns.
    pub async fn bulk_delete(&self, ctx: &RequestContext, ids: Vec<Uuid>) -> AppResult<u64> {
        let ids = dedup(ids);
        if ids.is_empty() {
            return Err(AppError::validation("No image ids given"));
        }

        let owned = self.images.count_owned_by_ids(&ids, ctx.user_id).await?;
        if owned != ids.len() as u64 {
            return Err(AppError::validation(
                "One or more images not found or not yours",
            ));
        }

        let paths = self.images.delete_owned_by_ids(&ids, ctx.user_id).await?;
        let deleted = paths.len() as u64;

        for path in paths {
            // The rows are already gone; a stale file is not worth failing
            // the request over.
            if let Err(e) = self.files.delete(&path).await {
                warn!(path, error = %e, "Failed to remove image file");
            }
        }

        info!(user_id = %ctx.user_id, deleted, "Deleted images");
        Ok(deleted)
    }
}

fn dedup(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use gallery_core::error::ErrorKind;
    use crate::testing::{FixedClock, InMemoryGallery, RecordingFileStore, ctx};

    fn setup() -> (Arc<InMemoryGallery>, Arc<RecordingFileStore>, ImageService) {
        let clock = FixedClock::at(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
        let gallery = InMemoryGallery::new(clock);
        let files = RecordingFileStore::new();
        let service = ImageService::new(gallery.clone(), gallery.clone(), files.clone());
        (gallery, files, service)
    }

    fn upload(name: &str) -> UploadImageRequest {
        UploadImageRequest {
            file_name: name.to_string(),
            data: Bytes::from_static(b"img"),
            title: String::new(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_upload_stores_files_and_rows() {
        let (gallery, files, service) = setup();
        let owner = Uuid::new_v4();

        let created = service
            .upload(&ctx(owner), vec![upload("a.png"), upload("b.png")], vec![])
            .await
            .unwrap();

        assert_eq!(created.len(), 2);
        assert_eq!(files.saved.lock().unwrap().len(), 2);
        // Empty title falls back to the file name.
        assert_eq!(created[0].title, "a.png");
        assert_eq!(gallery.count_by_ids(&[created[0].id]).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_upload_drops_unowned_tags() {
        let (gallery, _, service) = setup();
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mine = gallery.seed_tag(owner, "travel");
        let theirs = gallery.seed_tag(other, "travel");

        let created = service
            .upload(
                &ctx(owner),
                vec![upload("a.png")],
                vec![mine.id, theirs.id, Uuid::new_v4()],
            )
            .await
            .unwrap();

        assert_eq!(created[0].tag_ids, vec![mine.id]);
    }

    #[tokio::test]
    async fn test_upload_requires_files() {
        let (_, _, service) = setup();
        let err = service
            .upload(&ctx(Uuid::new_v4()), vec![], vec![])
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_get_scoped_to_owner() {
        let (gallery, _, service) = setup();
        let owner = Uuid::new_v4();
        let image = gallery.seed_image(owner);

        assert!(service.get(&ctx(owner), image).await.is_ok());
        let err = service.get(&ctx(Uuid::new_v4()), image).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_list_filters_by_keyword() {
        let (_, _, service) = setup();
        let owner = Uuid::new_v4();
        let mut sunset = upload("x.png");
        sunset.title = "Sunset over water".to_string();
        let mut portrait = upload("y.png");
        portrait.title = "Portrait".to_string();
        service
            .upload(&ctx(owner), vec![sunset, portrait], vec![])
            .await
            .unwrap();

        let page = service
            .list(&ctx(owner), Some("sunset".into()), vec![], PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].title, "Sunset over water");
    }

    #[tokio::test]
    async fn test_update_replaces_tags_with_owned_subset() {
        let (gallery, _, service) = setup();
        let owner = Uuid::new_v4();
        let image = gallery.seed_image(owner);
        let tag = gallery.seed_tag(owner, "new");

        let updated = service
            .update(
                &ctx(owner),
                image,
                UpdateImageRequest {
                    title: Some("Renamed".into()),
                    tag_ids: Some(vec![tag.id, Uuid::new_v4()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.tag_ids, vec![tag.id]);
    }

    #[tokio::test]
    async fn test_bulk_delete_is_all_or_nothing() {
        let (gallery, files, service) = setup();
        let owner = Uuid::new_v4();
        let image = gallery.seed_image(owner);
        let foreign = gallery.seed_image(Uuid::new_v4());

        let err = service
            .bulk_delete(&ctx(owner), vec![image, foreign])
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        // Nothing was removed.
        assert_eq!(gallery.count_by_ids(&[image, foreign]).await.unwrap(), 2);

        let deleted = service.bulk_delete(&ctx(owner), vec![image]).await.unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(files.deleted.lock().unwrap().len(), 1);
    }
}
