//! Image file storage configuration.

use serde::{Deserialize, Serialize};

/// Local file storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory where uploaded image files are written.
    #[serde(default = "default_root_dir")]
    pub root_dir: String,
    /// Maximum accepted upload size in bytes.
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            max_upload_size_bytes: default_max_upload(),
        }
    }
}

fn default_root_dir() -> String {
    "data/media".to_string()
}

fn default_max_upload() -> u64 {
    20 * 1024 * 1024
}
