//! Share link lifecycle: create, list, revoke, delete.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use gallery_core::error::{AppError, ErrorKind};
use gallery_core::result::AppResult;
use gallery_core::traits::clock::Clock;
use gallery_core::types::pagination::{PageRequest, PageResponse};
use gallery_database::store::{ImageStore, ShareStore};
use gallery_entity::share::{CreateShareLink, ShareLinkWithImages};

use super::code::CodeGenerator;
use super::expiry::resolve_expiry;
use crate::context::RequestContext;

/// Request to create a new share link.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CreateShareLinkRequest {
    /// Images to expose. At least one; duplicates are collapsed.
    pub image_ids: Vec<Uuid>,
    /// Optional access password. Empty string means unprotected.
    pub password: Option<String>,
    /// Relative lifetime in minutes. Wins over `expire_time`.
    pub duration_minutes: Option<i64>,
    /// Explicit expiry timestamp (RFC 3339, or naive taken as UTC).
    pub expire_time: Option<String>,
}

/// Manages the share link lifecycle for authenticated users.
#[derive(Debug, Clone)]
pub struct ShareService {
    shares: Arc<dyn ShareStore>,
    images: Arc<dyn ImageStore>,
    clock: Arc<dyn Clock>,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        shares: Arc<dyn ShareStore>,
        images: Arc<dyn ImageStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            shares,
            images,
            clock,
        }
    }

    /// Creates a share link over a set of existing images.
    ///
    /// Every referenced image must exist, but there is no ownership check:
    /// any authenticated user can share any existing image. Listing and
    /// revocation are ownership-scoped instead.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        req: CreateShareLinkRequest,
    ) -> AppResult<ShareLinkWithImages> {
        let image_ids = dedup(req.image_ids);
        if image_ids.is_empty() {
            return Err(AppError::validation("At least one image is required"));
        }

        let found = self.images.count_by_ids(&image_ids).await?;
        if found != image_ids.len() as u64 {
            return Err(AppError::not_found("One or more images not found"));
        }

        let password = req.password.filter(|p| !p.is_empty());
        let expire_time =
            resolve_expiry(self.clock.now(), req.duration_minutes, req.expire_time.as_deref())?;

        // The unique constraint on share_code is the real guard against two
        // writers picking the same code; on conflict, regenerate and retry.
        let link = loop {
            let share_code = CodeGenerator::generate_unused(self.shares.as_ref()).await?;
            let create = CreateShareLink {
                share_code,
                is_protected: password.is_some(),
                password: password.clone(),
                expire_time,
                image_ids: image_ids.clone(),
            };
            match self.shares.insert(&create).await {
                Ok(link) => break link,
                Err(e) if e.kind == ErrorKind::Conflict => continue,
                Err(e) => return Err(e),
            }
        };

        info!(
            user_id = %ctx.user_id,
            share_code = %link.share_code,
            images = image_ids.len(),
            protected = link.is_protected,
            "Created share link"
        );

        Ok(ShareLinkWithImages {
            id: link.id,
            share_code: link.share_code,
            is_protected: link.is_protected,
            password: link.password,
            expire_time: link.expire_time,
            created_time: link.created_time,
            image_ids,
        })
    }

    /// Lists the requester's share links, newest expiry first.
    ///
    /// A link is the requester's when any of its images was uploaded by them.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> AppResult<PageResponse<ShareLinkWithImages>> {
        self.shares.list_owned(ctx.user_id, &page).await
    }

    /// Revokes live owned links by rewriting their expiry to now.
    ///
    /// Already-expired links and links owned by others are skipped; if
    /// nothing matched at all, the request fails with not-found.
    pub async fn revoke(&self, ctx: &RequestContext, share_codes: Vec<String>) -> AppResult<u64> {
        if share_codes.is_empty() {
            return Err(AppError::validation("No share codes given"));
        }

        let revoked = self
            .shares
            .revoke_owned(&share_codes, ctx.user_id, self.clock.now())
            .await?;
        if revoked == 0 {
            return Err(AppError::not_found("No matching active share links"));
        }

        info!(user_id = %ctx.user_id, revoked, "Revoked share links");
        Ok(revoked)
    }

    /// Deletes owned links outright, expired or not.
    ///
    /// Removes the links and their image associations; the images themselves
    /// are untouched.
    pub async fn delete(&self, ctx: &RequestContext, share_codes: Vec<String>) -> AppResult<u64> {
        if share_codes.is_empty() {
            return Err(AppError::validation("No share codes given"));
        }

        let deleted = self.shares.delete_owned(&share_codes, ctx.user_id).await?;
        if deleted == 0 {
            return Err(AppError::not_found("No matching share links"));
        }

        info!(user_id = %ctx.user_id, deleted, "Deleted share links");
        Ok(deleted)
    }
}

/// Collapse duplicate ids, keeping first-seen order.
fn dedup(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
