//! Public access gate for share links.
//!
//! This is the only unauthenticated read path in the system. It reveals as
//! little as possible: an unknown code and a deleted link are the same 404,
//! and an expired link is refused before the password is even looked at, so
//! probing an expired protected link leaks nothing about its password.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use gallery_core::error::AppError;
use gallery_core::result::AppResult;
use gallery_core::traits::clock::Clock;
use gallery_database::store::{ImageStore, ShareStore};
use gallery_entity::image::Image;

/// Everything a visitor gets to see through a valid share link.
///
/// The password is deliberately absent.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AccessedShare {
    /// The code that was looked up.
    pub share_code: String,
    /// Whether the link required a password.
    pub is_protected: bool,
    /// When the link stops working.
    pub expire_time: DateTime<Utc>,
    /// The shared images.
    pub images: Vec<Image>,
}

/// Grants or refuses public access to shared images.
#[derive(Debug, Clone)]
pub struct ShareAccessService {
    shares: Arc<dyn ShareStore>,
    images: Arc<dyn ImageStore>,
    clock: Arc<dyn Clock>,
}

impl ShareAccessService {
    /// Creates a new access service.
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

    /// Resolves a share code to its images.
    ///
    /// Order of checks: existence, then expiry, then password.
    pub async fn access(&self, share_code: &str, password: Option<&str>) -> AppResult<AccessedShare> {
        let link = self
            .shares
            .find_by_code(share_code)
            .await?
            .ok_or_else(|| AppError::not_found("Invalid share code"))?;

        if link.is_expired_at(self.clock.now()) {
            debug!(share_code, "Refused access to expired share link");
            return Err(AppError::authorization("Share link has expired"));
        }

        if !link.password_matches(password) {
            debug!(share_code, "Refused access with wrong password");
            return Err(AppError::authorization("Invalid password"));
        }

        let images = self.images.find_by_ids(&link.image_ids).await?;

        Ok(AccessedShare {
            share_code: link.share_code,
            is_protected: link.is_protected,
            expire_time: link.expire_time,
            images,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use gallery_core::error::ErrorKind;
    use crate::share::service::{CreateShareLinkRequest, ShareService};
    use crate::testing::{FixedClock, InMemoryGallery, ctx};

    struct Harness {
        clock: Arc<FixedClock>,
        gallery: Arc<InMemoryGallery>,
        shares: ShareService,
        access: ShareAccessService,
    }

    fn setup() -> Harness {
        let clock = FixedClock::at(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap());
        let gallery = InMemoryGallery::new(clock.clone());
        Harness {
            shares: ShareService::new(gallery.clone(), gallery.clone(), clock.clone()),
            access: ShareAccessService::new(gallery.clone(), gallery.clone(), clock.clone()),
            clock,
            gallery,
        }
    }

    async fn share(h: &Harness, owner: Uuid, password: Option<&str>) -> (String, Uuid) {
        let image = h.gallery.seed_image(owner);
        let link = h
            .shares
            .create(
                &ctx(owner),
                CreateShareLinkRequest {
                    image_ids: vec![image],
                    password: password.map(String::from),
                    duration_minutes: Some(60),
                    expire_time: None,
                },
            )
            .await
            .unwrap();
        (link.share_code, image)
    }

    #[tokio::test]
    async fn test_unknown_code_is_not_found() {
        let h = setup();
        let err = h.access.access(&"0".repeat(32), None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_open_link_returns_images() {
        let h = setup();
        let owner = Uuid::new_v4();
        let (code, image) = share(&h, owner, None).await;

        let accessed = h.access.access(&code, None).await.unwrap();
        assert!(!accessed.is_protected);
        assert_eq!(accessed.images.len(), 1);
        assert_eq!(accessed.images[0].id, image);
    }

    #[tokio::test]
    async fn test_open_link_ignores_supplied_password() {
        let h = setup();
        let (code, _) = share(&h, Uuid::new_v4(), None).await;
        assert!(h.access.access(&code, Some("anything")).await.is_ok());
    }

    #[tokio::test]
    async fn test_protected_link_requires_exact_password() {
        let h = setup();
        let (code, _) = share(&h, Uuid::new_v4(), Some("Secret")).await;

        assert!(h.access.access(&code, Some("Secret")).await.is_ok());

        for wrong in [Some("secret"), Some(""), None] {
            let err = h.access.access(&code, wrong).await.unwrap_err();
            assert_eq!(err.kind, ErrorKind::Authorization);
        }
    }

    #[tokio::test]
    async fn test_expired_link_is_refused() {
        let h = setup();
        let (code, _) = share(&h, Uuid::new_v4(), None).await;

        h.clock.advance(chrono::Duration::minutes(61));

        let err = h.access.access(&code, None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }

    #[tokio::test]
    async fn test_expiry_checked_before_password() {
        // A wrong password on an expired protected link reports expiry, not
        // a password failure.
        let h = setup();
        let (code, _) = share(&h, Uuid::new_v4(), Some("Secret")).await;

        h.clock.advance(chrono::Duration::hours(2));

        let err = h.access.access(&code, Some("wrong")).await.unwrap_err();
        assert_eq!(err.message, "Share link has expired");
    }

    #[tokio::test]
    async fn test_revoked_link_is_immediately_inaccessible() {
        let h = setup();
        let owner = Uuid::new_v4();
        let (code, _) = share(&h, owner, None).await;

        h.shares.revoke(&ctx(owner), vec![code.clone()]).await.unwrap();

        let err = h.access.access(&code, None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }

    #[tokio::test]
    async fn test_response_never_contains_password() {
        let h = setup();
        let (code, _) = share(&h, Uuid::new_v4(), Some("hunter2")).await;

        let accessed = h.access.access(&code, Some("hunter2")).await.unwrap();
        let json = serde_json::to_string(&accessed).unwrap();
        assert!(!json.contains("hunter2"));
        assert!(!json.contains("password"));
    }
}
