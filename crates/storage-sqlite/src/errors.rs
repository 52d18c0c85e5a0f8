//! Storage-specific error types for SQLite operations.
//!
//! This module provides error types that wrap Diesel-specific errors and convert
//! them to the database-agnostic error types defined in `tenorvest_core`.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;
use tenorvest_core::errors::{DatabaseError, Error};

/// Storage-specific errors that wrap Diesel and r2d2 types.
///
/// These errors are internal to the storage layer and are converted to
/// `tenorvest_core::Error` before being returned to callers.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[from] diesel::ConnectionError),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    #[error("Query execution failed: {0}")]
    QueryFailed(#[from] DieselError),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Corrupt column value: {0}")]
    Corrupt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A domain error raised inside a write transaction. Carried through the
    /// rollback unchanged so callers still see conflicts and not-found errors.
    #[error(transparent)]
    Domain(Error),
}

impl From<Error> for StorageError {
    fn from(err: Error) -> Self {
        StorageError::Domain(err)
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Domain(e) => e,
            StorageError::ConnectionFailed(e) => {
                Error::Database(DatabaseError::ConnectionFailed(e.to_string()))
            }
            StorageError::PoolError(e) => {
                Error::Database(DatabaseError::PoolCreationFailed(e.to_string()))
            }
            StorageError::QueryFailed(DieselError::NotFound) => {
                Error::NotFound("Record not found".to_string())
            }
            StorageError::QueryFailed(DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                info,
            )) => Error::Database(DatabaseError::UniqueViolation(info.message().to_string())),
            StorageError::QueryFailed(DieselError::DatabaseError(
                DatabaseErrorKind::ForeignKeyViolation,
                info,
            )) => Error::Database(DatabaseError::ForeignKeyViolation(
                info.message().to_string(),
            )),
            StorageError::QueryFailed(e) => {
                Error::Database(DatabaseError::QueryFailed(e.to_string()))
            }
            StorageError::MigrationFailed(e) => Error::Database(DatabaseError::MigrationFailed(e)),
            StorageError::Corrupt(e) => Error::Database(DatabaseError::Corrupt(e)),
            StorageError::Io(e) => Error::Database(DatabaseError::Internal(e.to_string())),
        }
    }
}

/// Extension trait for easily converting Diesel Results to core Results.
///
/// This provides a `.into_core()` method on any `Result<T, diesel::result::Error>`
/// which handles the conversion through StorageError.
pub trait IntoCore<T> {
    fn into_core(self) -> tenorvest_core::Result<T>;
}

impl<T> IntoCore<T> for std::result::Result<T, DieselError> {
    fn into_core(self) -> tenorvest_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}

impl<T> IntoCore<T> for std::result::Result<T, r2d2::Error> {
    fn into_core(self) -> tenorvest_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}

/// Like [`IntoCore::into_core`], but a missing row becomes `Error::NotFound`
/// naming what was looked up.
pub trait OrNotFound<T> {
    fn or_not_found(self, what: impl FnOnce() -> String) -> tenorvest_core::Result<T>;
}

impl<T> OrNotFound<T> for std::result::Result<T, DieselError> {
    fn or_not_found(self, what: impl FnOnce() -> String) -> tenorvest_core::Result<T> {
        match self {
            Err(DieselError::NotFound) => Err(Error::NotFound(what())),
            other => other.into_core(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_survive_the_round_trip() {
        let storage: StorageError = Error::ConcurrencyConflict("row moved".to_string()).into();
        let back: Error = storage.into();
        assert!(matches!(back, Error::ConcurrencyConflict(msg) if msg == "row moved"));
    }

    #[test]
    fn missing_rows_become_not_found() {
        let result: std::result::Result<(), DieselError> = Err(DieselError::NotFound);
        let err = result.or_not_found(|| "account acc-9".to_string()).unwrap_err();
        assert!(matches!(err, Error::NotFound(msg) if msg == "account acc-9"));
    }
}
