//! Tag entity models.

pub mod model;

pub use model::Tag;
