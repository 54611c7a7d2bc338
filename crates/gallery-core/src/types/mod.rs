//! Core type definitions used across the SuGallery workspace.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse};
