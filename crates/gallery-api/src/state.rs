//! Shared application state passed to every handler.

use std::sync::Arc;

use gallery_auth::jwt::JwtDecoder;
use gallery_core::config::AppConfig;
use gallery_database::DatabasePool;
use gallery_service::{ImageService, ShareAccessService, ShareService, TagService, UserService};

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Database pool, used directly only by the health endpoint.
    pub db: DatabasePool,
    /// Access-token decoder for the auth extractor.
    pub jwt_decoder: JwtDecoder,
    /// Share link lifecycle.
    pub shares: Arc<ShareService>,
    /// Public share access gate.
    pub share_access: Arc<ShareAccessService>,
    /// Image management.
    pub images: Arc<ImageService>,
    /// Tag management.
    pub tags: Arc<TagService>,
    /// Accounts, credentials, and tokens.
    pub users: Arc<UserService>,
}
