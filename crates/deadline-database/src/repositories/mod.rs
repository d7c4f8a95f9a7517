//! PostgreSQL implementations of the store traits.

pub mod collaborator;
pub mod deadline;
pub mod friendship;
pub mod notification;
pub mod user;

pub use collaborator::CollaboratorRepository;
pub use deadline::DeadlineRepository;
pub use friendship::FriendshipRepository;
pub use notification::NotificationRepository;
pub use user::UserRepository;

use deadline_core::error::{AppError, ErrorKind};

/// SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

/// Map a sqlx error, turning unique violations into `Conflict`.
pub(crate) fn db_error(message: &str, err: sqlx::Error) -> AppError {
    let unique = err
        .as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == UNIQUE_VIOLATION)
        .unwrap_or(false);
    let kind = if unique {
        ErrorKind::Conflict
    } else {
        ErrorKind::Database
    };
    AppError::with_source(kind, message.to_string(), err)
}
