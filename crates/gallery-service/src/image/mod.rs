//! Image upload and management.

pub mod service;

pub use service::{ImageService, UpdateImageRequest, UploadImageRequest};
