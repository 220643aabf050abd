use sqlx::error::ErrorKind;
use thiserror::Error;

/// Typed failures surfaced by the credential and conversation stores.
/// Everything else rides on the underlying `sqlx::Error`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username or email already registered")]
    DuplicateUser,
    #[error("chat not found")]
    ChatNotFound,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("password hashing failed")]
    Hash(#[from] bcrypt::BcryptError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Maps a unique violation on the users table to `DuplicateUser`.
    pub fn from_unique_violation(err: sqlx::Error) -> Self {
        match err.as_database_error().map(|db| db.kind()) {
            Some(ErrorKind::UniqueViolation) => StoreError::DuplicateUser,
            _ => StoreError::Database(err),
        }
    }

    /// Maps a foreign-key violation from a message insert to `ChatNotFound`.
    pub fn from_message_insert(err: sqlx::Error) -> Self {
        match err.as_database_error().map(|db| db.kind()) {
            Some(ErrorKind::ForeignKeyViolation) => StoreError::ChatNotFound,
            _ => StoreError::Database(err),
        }
    }
}
