//! Tag entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A user-scoped image tag.
///
/// Tag names are unique per user, not globally; two users can both have a
/// "travel" tag.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tag {
    /// Unique tag identifier.
    pub id: Uuid,
    /// Tag name.
    pub name: String,
    /// The user who created the tag.
    pub uploaded_by: Uuid,
}
