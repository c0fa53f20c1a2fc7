//! Store-level errors.

use common::AppError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Errors raised by a [`crate::store::DocumentStore`] backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A second document claimed an existing `(collection, unique_key)` pair
    #[error("duplicate key in {collection}: {key}")]
    DuplicateKey { collection: String, key: String },

    /// The backend could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("document encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error(transparent)]
    Database(DbErr),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::DuplicateKey {
                collection: String::new(),
                key: detail,
            },
            _ => match err {
                DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => {
                    StoreError::Unavailable(err.to_string())
                }
                other => StoreError::Database(other),
            },
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { .. } => AppError::conflict("Record"),
            StoreError::Unavailable(reason) => AppError::service_unavailable(reason),
            StoreError::Encoding(e) => AppError::internal(format!("document encoding: {}", e)),
            StoreError::Database(e) => AppError::Database(e),
        }
    }
}
