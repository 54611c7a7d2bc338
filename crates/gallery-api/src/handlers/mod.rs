//! HTTP request handlers, grouped by domain.

pub mod auth;
pub mod health;
pub mod image;
pub mod share;
pub mod tag;
pub mod user;
