//! Tag management.

pub mod service;

pub use service::TagService;
