//! User entity and email verification models.

pub mod model;
pub mod verification;

pub use model::{CreateUser, User, UserType};
pub use verification::EmailVerification;
