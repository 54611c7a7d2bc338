//! sqlx-backed implementations of the store ports.

pub mod image;
pub mod share;
pub mod tag;
pub mod user;
pub mod verification;

pub use image::ImageRepository;
pub use share::ShareRepository;
pub use tag::TagRepository;
pub use user::UserRepository;
pub use verification::VerificationRepository;

use gallery_core::error::{AppError, ErrorKind};

/// Map an insert error, turning unique-constraint violations into conflicts
/// the caller can act on.
pub(crate) fn map_insert_err(
    e: sqlx::Error,
    conflict_message: &str,
    context: &str,
) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return AppError::conflict(conflict_message);
        }
    }
    AppError::with_source(ErrorKind::Database, context.to_string(), e)
}

/// Map any other database error.
pub(crate) fn map_db_err(context: &str) -> impl FnOnce(sqlx::Error) -> AppError + '_ {
    move |e| AppError::with_source(ErrorKind::Database, context.to_string(), e)
}
