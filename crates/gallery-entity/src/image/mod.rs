//! Image entity models.

pub mod model;

pub use model::{CreateImage, Image, ImageWithTags};
