//! # gallery-entity
//!
//! Entity models for SuGallery: users, images, tags, and share links.
//! Each model maps one-to-one onto a database table via `sqlx::FromRow`.

pub mod image;
pub mod share;
pub mod tag;
pub mod user;
