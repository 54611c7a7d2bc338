//! # gallery-service
//!
//! Business logic for SuGallery. The share module is the heart of the
//! system: share link creation, management, and the public access gate.
//! Image, tag, and user services support it.

pub mod context;
pub mod image;
pub mod share;
pub mod tag;
pub mod user;

#[cfg(test)]
pub(crate) mod testing;

pub use context::RequestContext;
pub use image::ImageService;
pub use share::{ShareAccessService, ShareService};
pub use tag::TagService;
pub use user::UserService;
