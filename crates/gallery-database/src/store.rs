//! Store ports consumed by the service layer.
//!
//! Services hold these as trait objects so business rules can be exercised
//! against in-memory fakes; the sqlx repositories in [`crate::repositories`]
//! are the production implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use gallery_core::result::AppResult;
use gallery_core::types::pagination::{PageRequest, PageResponse};
use gallery_entity::image::{CreateImage, Image, ImageWithTags};
use gallery_entity::share::{CreateShareLink, ShareLink, ShareLinkWithImages};
use gallery_entity::tag::Tag;
use gallery_entity::user::{CreateUser, EmailVerification, User};

/// Filters applied to an owner's image listing.
#[derive(Debug, Clone, Default)]
pub struct ImageFilter {
    /// Substring match on the title, case-insensitive.
    pub keyword: Option<String>,
    /// Keep images carrying at least one of these tags.
    pub tag_ids: Vec<Uuid>,
}

/// Fields of an image that can be edited after upload.
#[derive(Debug, Clone, Default)]
pub struct UpdateImage {
    /// New title, if changing.
    pub title: Option<String>,
    /// New description, if changing.
    pub description: Option<String>,
    /// Full replacement tag set, if changing.
    pub tag_ids: Option<Vec<Uuid>>,
}

/// Persistence port for share links.
#[async_trait]
pub trait ShareStore: Send + Sync + std::fmt::Debug + 'static {
    /// Whether a share code is already taken.
    async fn code_exists(&self, share_code: &str) -> AppResult<bool>;

    /// Persist a new link with its image associations.
    ///
    /// A duplicate `share_code` must surface as `ErrorKind::Conflict` so the
    /// caller can regenerate and retry.
    async fn insert(&self, data: &CreateShareLink) -> AppResult<ShareLink>;

    /// Look up a link by its public code, with associated image ids.
    async fn find_by_code(&self, share_code: &str) -> AppResult<Option<ShareLinkWithImages>>;

    /// Page through the links owned by a user.
    ///
    /// Ownership is transitive: a link is owned when any associated image was
    /// uploaded by the user. Ordered by expiry descending, then creation
    /// ascending.
    async fn list_owned(
        &self,
        owner: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareLinkWithImages>>;

    /// Expire the given owned, still-live links at `now`. Returns the number
    /// of links actually revoked.
    async fn revoke_owned(
        &self,
        share_codes: &[String],
        owner: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Delete the given owned links, expired or not. Returns the number of
    /// links removed. Associations go with them; images are untouched.
    async fn delete_owned(&self, share_codes: &[String], owner: Uuid) -> AppResult<u64>;
}

/// Persistence port for images.
#[async_trait]
pub trait ImageStore: Send + Sync + std::fmt::Debug + 'static {
    /// Persist a new image record with its tag associations.
    async fn insert(&self, data: &CreateImage) -> AppResult<ImageWithTags>;

    /// Look up an image owned by the given user.
    async fn find_owned(&self, id: Uuid, owner: Uuid) -> AppResult<Option<ImageWithTags>>;

    /// Fetch images by id, in no guaranteed order.
    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Image>>;

    /// How many of the given ids exist, regardless of owner.
    async fn count_by_ids(&self, ids: &[Uuid]) -> AppResult<u64>;

    /// How many of the given ids exist and belong to the owner.
    async fn count_owned_by_ids(&self, ids: &[Uuid], owner: Uuid) -> AppResult<u64>;

    /// Page through an owner's images, newest first.
    async fn list_owned(
        &self,
        owner: Uuid,
        filter: &ImageFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ImageWithTags>>;

    /// Apply edits to an owned image. Returns `None` when the image does not
    /// exist or is not owned by the user.
    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        update: &UpdateImage,
    ) -> AppResult<Option<ImageWithTags>>;

    /// Delete the given owned images. Returns the storage paths of the
    /// removed files for cleanup.
    async fn delete_owned_by_ids(&self, ids: &[Uuid], owner: Uuid) -> AppResult<Vec<String>>;
}

/// Persistence port for tags.
#[async_trait]
pub trait TagStore: Send + Sync + std::fmt::Debug + 'static {
    /// Create a tag for a user. Duplicate names per user surface as
    /// `ErrorKind::Conflict`.
    async fn insert(&self, owner: Uuid, name: &str) -> AppResult<Tag>;

    /// All tags belonging to a user, sorted by name.
    async fn list_owned(&self, owner: Uuid) -> AppResult<Vec<Tag>>;

    /// Of the given tag ids, the subset that exists and belongs to the owner.
    async fn filter_owned_ids(&self, ids: &[Uuid], owner: Uuid) -> AppResult<Vec<Uuid>>;
}

/// Persistence port for user accounts.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug + 'static {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Create an account. Duplicate username or email surfaces as
    /// `ErrorKind::Conflict`.
    async fn insert(&self, data: &CreateUser) -> AppResult<User>;

    async fn update_last_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()>;

    /// Update profile fields; `None` leaves a field unchanged.
    async fn update_profile(
        &self,
        id: Uuid,
        store_name: Option<&str>,
        email: Option<&str>,
    ) -> AppResult<Option<User>>;
}

/// Persistence port for email verification codes.
#[async_trait]
pub trait VerificationStore: Send + Sync + std::fmt::Debug + 'static {
    /// The most recently issued code for an address, if any.
    async fn latest_for_email(&self, email: &str) -> AppResult<Option<EmailVerification>>;

    /// Record a freshly issued code.
    async fn insert(
        &self,
        email: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<EmailVerification>;

    /// Mark a code as consumed by a successful registration.
    async fn mark_verified(&self, id: Uuid) -> AppResult<()>;
}
