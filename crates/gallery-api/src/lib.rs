//! # gallery-api
//!
//! HTTP layer for SuGallery built on Axum: REST routes, middleware,
//! extractors, DTOs, and the [`error::ApiError`] → HTTP status mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
