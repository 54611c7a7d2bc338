//! # gallery-cache
//!
//! TTL key-value cache used for captcha challenges and the JWT blocklist.
//! The only backend is an in-process moka cache; the service layer depends
//! on the [`gallery_core::traits::CacheProvider`] trait, not this crate's
//! concrete types.

pub mod keys;
pub mod memory;
pub mod provider;

pub use provider::CacheManager;
