//! # gallery-core
//!
//! Core crate for SuGallery. Contains configuration schemas, collaborator
//! traits, pagination types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other SuGallery crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
