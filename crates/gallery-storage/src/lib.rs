//! # gallery-storage
//!
//! Filesystem-backed storage for uploaded image files. The service layer
//! depends only on the [`gallery_core::traits::FileStore`] trait; this crate
//! provides the local-disk implementation used in production.

pub mod local;

pub use local::LocalFileStore;
