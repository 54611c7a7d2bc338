//! Accounts: registration, login, token refresh, profile.

pub mod service;

pub use service::{LoginRequest, LoginResponse, RegisterRequest, UserService};
