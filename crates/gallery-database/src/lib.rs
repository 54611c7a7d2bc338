//! # gallery-database
//!
//! PostgreSQL access layer: connection pool, migration runner, the store
//! ports the service layer depends on, and their sqlx-backed repository
//! implementations.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use migration::run_migrations;
pub use store::{ImageStore, ShareStore, TagStore, UserStore, VerificationStore};
