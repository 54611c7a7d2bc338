//! In-memory fakes backing the service unit tests.
//!
//! The fakes honor the same contracts as the sqlx repositories (conflict on
//! duplicate codes, transitive share ownership, ordering) so lifecycle rules
//! can be exercised without a database.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_core::traits::clock::Clock;
use gallery_core::traits::storage::FileStore;
use gallery_core::types::pagination::{PageRequest, PageResponse};
use gallery_database::store::{
    ImageFilter, ImageStore, ShareStore, TagStore, UpdateImage, UserStore, VerificationStore,
};
use gallery_entity::image::{CreateImage, Image, ImageWithTags};
use gallery_entity::share::{CreateShareLink, ShareLink, ShareLinkWithImages};
use gallery_entity::tag::Tag;
use gallery_entity::user::{CreateUser, EmailVerification, User};

use crate::context::RequestContext;

/// Clock pinned to a settable instant.
#[derive(Debug)]
pub struct FixedClock(Mutex<DateTime<Utc>>);

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self(Mutex::new(now)))
    }

    pub fn advance(&self, by: chrono::Duration) {
        *self.0.lock().unwrap() += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// Request context for an arbitrary test user.
pub fn ctx(user_id: Uuid) -> RequestContext {
    RequestContext::new(
        user_id,
        gallery_entity::user::UserType::Business,
        "tester".to_string(),
    )
}

/// In-memory gallery holding images, tags, and share links together, so
/// transitive share ownership resolves exactly like the SQL does.
#[derive(Debug)]
pub struct InMemoryGallery {
    clock: Arc<FixedClock>,
    images: Mutex<Vec<ImageWithTags>>,
    tags: Mutex<Vec<Tag>>,
    links: Mutex<Vec<ShareLinkWithImages>>,
}

impl InMemoryGallery {
    pub fn new(clock: Arc<FixedClock>) -> Arc<Self> {
        Arc::new(Self {
            clock,
            images: Mutex::new(Vec::new()),
            tags: Mutex::new(Vec::new()),
            links: Mutex::new(Vec::new()),
        })
    }

    /// Seed an image owned by `owner` and return its id.
    pub fn seed_image(&self, owner: Uuid) -> Uuid {
        let id = Uuid::new_v4();
        self.images.lock().unwrap().push(ImageWithTags {
            id,
            title: "seed".to_string(),
            description: None,
            file_path: format!("images/{id}.png"),
            uploaded_by: owner,
            created_at: self.clock.now(),
            tag_ids: Vec::new(),
        });
        id
    }

    /// Seed a tag owned by `owner`.
    pub fn seed_tag(&self, owner: Uuid, name: &str) -> Tag {
        let tag = Tag {
            id: Uuid::new_v4(),
            name: name.to_string(),
            uploaded_by: owner,
        };
        self.tags.lock().unwrap().push(tag.clone());
        tag
    }

    fn owns_link(&self, link: &ShareLinkWithImages, owner: Uuid) -> bool {
        let images = self.images.lock().unwrap();
        link.image_ids
            .iter()
            .any(|id| images.iter().any(|i| i.id == *id && i.uploaded_by == owner))
    }

    fn paginate<T: Clone + serde::Serialize>(items: Vec<T>, page: &PageRequest) -> PageResponse<T> {
        let total = items.len() as u64;
        let window = items
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        PageResponse::new(window, page.page, page.page_size, total)
    }
}

#[async_trait]
impl ShareStore for InMemoryGallery {
    async fn code_exists(&self, share_code: &str) -> AppResult<bool> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .any(|l| l.share_code == share_code))
    }

    async fn insert(&self, data: &CreateShareLink) -> AppResult<ShareLink> {
        let mut links = self.links.lock().unwrap();
        if links.iter().any(|l| l.share_code == data.share_code) {
            return Err(AppError::conflict("Share code already in use"));
        }
        let link = ShareLinkWithImages {
            id: Uuid::new_v4(),
            share_code: data.share_code.clone(),
            is_protected: data.is_protected,
            password: data.password.clone(),
            expire_time: data.expire_time,
            created_time: self.clock.now(),
            image_ids: data.image_ids.clone(),
        };
        links.push(link.clone());
        Ok(ShareLink {
            id: link.id,
            share_code: link.share_code,
            is_protected: link.is_protected,
            password: link.password,
            expire_time: link.expire_time,
            created_time: link.created_time,
        })
    }

    async fn find_by_code(&self, share_code: &str) -> AppResult<Option<ShareLinkWithImages>> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.share_code == share_code)
            .cloned())
    }

    async fn list_owned(
        &self,
        owner: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareLinkWithImages>> {
        let mut owned: Vec<_> = self
            .links
            .lock()
            .unwrap()
            .iter()
            .filter(|l| self.owns_link(l, owner))
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            b.expire_time
                .cmp(&a.expire_time)
                .then(a.created_time.cmp(&b.created_time))
        });
        Ok(Self::paginate(owned, page))
    }

    async fn revoke_owned(
        &self,
        share_codes: &[String],
        owner: Uuid,
        now: DateTime<Utc>,
    ) -> AppResult<u64> {
        let targets: Vec<Uuid> = self
            .links
            .lock()
            .unwrap()
            .iter()
            .filter(|l| {
                share_codes.contains(&l.share_code)
                    && l.expire_time > now
                    && self.owns_link(l, owner)
            })
            .map(|l| l.id)
            .collect();

        let mut links = self.links.lock().unwrap();
        for link in links.iter_mut().filter(|l| targets.contains(&l.id)) {
            link.expire_time = now;
        }
        Ok(targets.len() as u64)
    }

    async fn delete_owned(&self, share_codes: &[String], owner: Uuid) -> AppResult<u64> {
        let targets: Vec<Uuid> = self
            .links
            .lock()
            .unwrap()
            .iter()
            .filter(|l| share_codes.contains(&l.share_code) && self.owns_link(l, owner))
            .map(|l| l.id)
            .collect();

        let mut links = self.links.lock().unwrap();
        let before = links.len();
        links.retain(|l| !targets.contains(&l.id));
        Ok((before - links.len()) as u64)
    }
}

#[async_trait]
impl ImageStore for InMemoryGallery {
    async fn insert(&self, data: &CreateImage) -> AppResult<ImageWithTags> {
        let image = ImageWithTags {
            id: Uuid::new_v4(),
            title: data.title.clone(),
            description: data.description.clone(),
            file_path: data.file_path.clone(),
            uploaded_by: data.uploaded_by,
            created_at: self.clock.now(),
            tag_ids: data.tag_ids.clone(),
        };
        self.images.lock().unwrap().push(image.clone());
        Ok(image)
    }

    async fn find_owned(&self, id: Uuid, owner: Uuid) -> AppResult<Option<ImageWithTags>> {
        Ok(self
            .images
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == id && i.uploaded_by == owner)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Image>> {
        let mut found: Vec<Image> = self
            .images
            .lock()
            .unwrap()
            .iter()
            .filter(|i| ids.contains(&i.id))
            .map(|i| Image {
                id: i.id,
                title: i.title.clone(),
                description: i.description.clone(),
                file_path: i.file_path.clone(),
                uploaded_by: i.uploaded_by,
                created_at: i.created_at,
            })
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn count_by_ids(&self, ids: &[Uuid]) -> AppResult<u64> {
        Ok(self
            .images
            .lock()
            .unwrap()
            .iter()
            .filter(|i| ids.contains(&i.id))
            .count() as u64)
    }

    async fn count_owned_by_ids(&self, ids: &[Uuid], owner: Uuid) -> AppResult<u64> {
        Ok(self
            .images
            .lock()
            .unwrap()
            .iter()
            .filter(|i| ids.contains(&i.id) && i.uploaded_by == owner)
            .count() as u64)
    }

    async fn list_owned(
        &self,
        owner: Uuid,
        filter: &ImageFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ImageWithTags>> {
        let keyword = filter.keyword.as_deref().map(str::to_lowercase);
        let mut owned: Vec<_> = self
            .images
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.uploaded_by == owner)
            .filter(|i| {
                keyword
                    .as_deref()
                    .is_none_or(|kw| i.title.to_lowercase().contains(kw))
            })
            .filter(|i| {
                filter.tag_ids.is_empty()
                    || i.tag_ids.iter().any(|t| filter.tag_ids.contains(t))
            })
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(Self::paginate(owned, page))
    }

    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        update: &UpdateImage,
    ) -> AppResult<Option<ImageWithTags>> {
        let mut images = self.images.lock().unwrap();
        let Some(image) = images
            .iter_mut()
            .find(|i| i.id == id && i.uploaded_by == owner)
        else {
            return Ok(None);
        };
        if let Some(title) = &update.title {
            image.title = title.clone();
        }
        if let Some(description) = &update.description {
            image.description = Some(description.clone());
        }
        if let Some(tag_ids) = &update.tag_ids {
            image.tag_ids = tag_ids.clone();
        }
        Ok(Some(image.clone()))
    }

    async fn delete_owned_by_ids(&self, ids: &[Uuid], owner: Uuid) -> AppResult<Vec<String>> {
        let mut images = self.images.lock().unwrap();
        let removed: Vec<String> = images
            .iter()
            .filter(|i| ids.contains(&i.id) && i.uploaded_by == owner)
            .map(|i| i.file_path.clone())
            .collect();
        images.retain(|i| !(ids.contains(&i.id) && i.uploaded_by == owner));
        Ok(removed)
    }
}

#[async_trait]
impl TagStore for InMemoryGallery {
    async fn insert(&self, owner: Uuid, name: &str) -> AppResult<Tag> {
        let mut tags = self.tags.lock().unwrap();
        if tags.iter().any(|t| t.uploaded_by == owner && t.name == name) {
            return Err(AppError::conflict("Tag already exists"));
        }
        let tag = Tag {
            id: Uuid::new_v4(),
            name: name.to_string(),
            uploaded_by: owner,
        };
        tags.push(tag.clone());
        Ok(tag)
    }

    async fn list_owned(&self, owner: Uuid) -> AppResult<Vec<Tag>> {
        let mut owned: Vec<_> = self
            .tags
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.uploaded_by == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(owned)
    }

    async fn filter_owned_ids(&self, ids: &[Uuid], owner: Uuid) -> AppResult<Vec<Uuid>> {
        Ok(self
            .tags
            .lock()
            .unwrap()
            .iter()
            .filter(|t| ids.contains(&t.id) && t.uploaded_by == owner)
            .map(|t| t.id)
            .collect())
    }
}

/// In-memory user accounts.
#[derive(Debug, Default)]
pub struct InMemoryUsers {
    users: Mutex<Vec<User>>,
}

impl InMemoryUsers {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl UserStore for InMemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert(&self, data: &CreateUser) -> AppResult<User> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.username == data.username || u.email == data.email)
        {
            return Err(AppError::conflict("Username or email already registered"));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: data.username.clone(),
            email: data.email.clone(),
            password_hash: data.password_hash.clone(),
            store_name: None,
            user_type: data.user_type,
            avatar_path: None,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn update_last_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()> {
        if let Some(user) = self.users.lock().unwrap().iter_mut().find(|u| u.id == id) {
            user.last_login_at = Some(at);
        }
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        store_name: Option<&str>,
        email: Option<&str>,
    ) -> AppResult<Option<User>> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(store_name) = store_name {
            user.store_name = Some(store_name.to_string());
        }
        if let Some(email) = email {
            user.email = email.to_string();
        }
        Ok(Some(user.clone()))
    }
}

/// In-memory email verification codes, stamped with the shared test clock.
#[derive(Debug)]
pub struct InMemoryVerifications {
    clock: Arc<FixedClock>,
    rows: Mutex<Vec<EmailVerification>>,
}

impl InMemoryVerifications {
    pub fn new(clock: Arc<FixedClock>) -> Arc<Self> {
        Arc::new(Self {
            clock,
            rows: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl VerificationStore for InMemoryVerifications {
    async fn latest_for_email(&self, email: &str) -> AppResult<Option<EmailVerification>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.email == email)
            .max_by_key(|v| v.created_at)
            .cloned())
    }

    async fn insert(
        &self,
        email: &str,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<EmailVerification> {
        let row = EmailVerification {
            id: Uuid::new_v4(),
            email: email.to_string(),
            code: code.to_string(),
            is_verified: false,
            created_at: self.clock.now(),
            expires_at,
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn mark_verified(&self, id: Uuid) -> AppResult<()> {
        if let Some(row) = self.rows.lock().unwrap().iter_mut().find(|v| v.id == id) {
            row.is_verified = true;
        }
        Ok(())
    }
}

/// File store that records calls without touching disk.
#[derive(Debug, Default)]
pub struct RecordingFileStore {
    pub saved: Mutex<Vec<String>>,
    pub deleted: Mutex<Vec<String>>,
}

impl RecordingFileStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl FileStore for RecordingFileStore {
    async fn save(&self, file_name: &str, _data: bytes::Bytes) -> AppResult<String> {
        let path = format!("mem/{}_{}", Uuid::new_v4().simple(), file_name);
        self.saved.lock().unwrap().push(path.clone());
        Ok(path)
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        self.deleted.lock().unwrap().push(path.to_string());
        Ok(())
    }
}
