//! File storage collaborator boundary for uploaded image bytes.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Stores and removes raw image files.
///
/// The returned path is an opaque storage-relative string persisted on the
/// image record and echoed back to clients.
#[async_trait]
pub trait FileStore: Send + Sync + std::fmt::Debug + 'static {
    /// Persist a file and return its storage path.
    async fn save(&self, file_name: &str, data: Bytes) -> AppResult<String>;

    /// Remove a previously stored file. Missing files are not an error.
    async fn delete(&self, path: &str) -> AppResult<()>;
}
