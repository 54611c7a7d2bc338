//! Image entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An uploaded image.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Image {
    /// Unique image identifier.
    pub id: Uuid,
    /// Display title (may be empty).
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Storage path of the image file.
    pub file_path: String,
    /// The user who uploaded the image.
    pub uploaded_by: Uuid,
    /// When the image was uploaded.
    pub created_at: DateTime<Utc>,
}

/// An image together with its tag ids.
///
/// Returned by list/detail queries where the tags are aggregated in SQL.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ImageWithTags {
    /// Unique image identifier.
    pub id: Uuid,
    /// Display title.
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Storage path of the image file.
    pub file_path: String,
    /// The user who uploaded the image.
    pub uploaded_by: Uuid,
    /// When the image was uploaded.
    pub created_at: DateTime<Utc>,
    /// Ids of the tags attached to this image.
    pub tag_ids: Vec<Uuid>,
}

/// Data required to create a new image record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateImage {
    /// Display title (empty string allowed).
    pub title: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Storage path returned by the file store.
    pub file_path: String,
    /// The uploading user.
    pub uploaded_by: Uuid,
    /// Tags to attach (must belong to the uploader).
    pub tag_ids: Vec<Uuid>,
}
