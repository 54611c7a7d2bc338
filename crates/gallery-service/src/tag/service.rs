//! Tag service: per-user tag creation and listing.

use std::sync::Arc;

use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_database::store::TagStore;
use gallery_entity::tag::Tag;

use crate::context::RequestContext;

/// Manages a user's tags.
#[derive(Debug, Clone)]
pub struct TagService {
    tags: Arc<dyn TagStore>,
}

impl TagService {
    /// Creates a new tag service.
    pub fn new(tags: Arc<dyn TagStore>) -> Self {
        Self { tags }
    }

    /// Creates a tag. Names are unique per user, compared after trimming.
    pub async fn create(&self, ctx: &RequestContext, name: &str) -> AppResult<Tag> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Tag name is required"));
        }
        self.tags.insert(ctx.user_id, name).await
    }

    /// Lists the requester's tags, sorted by name.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<Tag>> {
        self.tags.list_owned(ctx.user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use gallery_core::error::ErrorKind;
    use crate::testing::{FixedClock, InMemoryGallery, ctx};

    fn service() -> TagService {
        let clock = FixedClock::at(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
        TagService::new(InMemoryGallery::new(clock))
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let service = service();
        let owner = Uuid::new_v4();

        service.create(&ctx(owner), "zoo").await.unwrap();
        service.create(&ctx(owner), "  animals  ").await.unwrap();

        let tags = service.list(&ctx(owner)).await.unwrap();
        let names: Vec<_> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["animals", "zoo"]);
    }

    #[tokio::test]
    async fn test_duplicate_name_per_user_conflicts() {
        let service = service();
        let owner = Uuid::new_v4();

        service.create(&ctx(owner), "travel").await.unwrap();
        let err = service.create(&ctx(owner), "travel").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        // A different user can reuse the name.
        assert!(service.create(&ctx(Uuid::new_v4()), "travel").await.is_ok());
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let service = service();
        let err = service.create(&ctx(Uuid::new_v4()), "   ").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
