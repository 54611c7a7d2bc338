//! Share link entity models.

pub mod model;

pub use model::{CreateShareLink, ShareLink, ShareLinkWithImages};
