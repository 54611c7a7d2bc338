//! Local filesystem file store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use gallery_core::config::storage::StorageConfig;
use gallery_core::error::{AppError, ErrorKind};
use gallery_core::result::AppResult;
use gallery_core::traits::storage::FileStore;

/// File store rooted at a directory on the local filesystem.
///
/// Stored paths are relative to the root and carry a random prefix so that
/// repeated uploads of the same file name never collide.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    /// Root directory for all stored files.
    root: PathBuf,
}

impl LocalFileStore {
    /// Create a new local file store rooted at the configured directory.
    pub async fn new(config: &StorageConfig) -> AppResult<Self> {
        let root = PathBuf::from(&config.root_dir);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a storage-relative path to an absolute path within the root.
    fn resolve(&self, path: &str) -> PathBuf {
        let clean = path.trim_start_matches('/');
        self.root.join(clean)
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn save(&self, file_name: &str, data: Bytes) -> AppResult<String> {
        // Keep only the final path component of the client-supplied name.
        let base = Path::new(file_name)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "upload".to_string());

        let stored_path = format!("images/{}_{}", Uuid::new_v4().simple(), base);
        let full_path = self.resolve(&stored_path);
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write file: {stored_path}"),
                e,
            )
        })?;

        debug!(path = %stored_path, bytes = data.len(), "Stored file");
        Ok(stored_path)
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let full_path = self.resolve(path);
        match fs::remove_file(&full_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete file: {path}"),
                e,
            )),
        }
    }
}
