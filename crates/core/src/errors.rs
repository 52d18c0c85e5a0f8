//! Core error types for the tenorvest engine.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::withdrawals::WithdrawalSource;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the engine.
///
/// Every engine operation returns one of these instead of panicking; the
/// surrounding UI/API layer decides how to present it.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Insufficient funds in {bucket}: requested {requested}, available {available}")]
    InsufficientFunds {
        bucket: FundsSource,
        requested: Decimal,
        available: Decimal,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(#[from] StateTransitionError),

    #[error("Concurrent modification detected: {0}")]
    ConcurrencyConflict(String),

    #[error("Nothing to claim on investment {investment_id}")]
    NothingToClaim { investment_id: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// True for the one error kind that a caller may retry automatically.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::ConcurrencyConflict(_))
    }
}

/// The balance a debit was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FundsSource {
    Balance,
    Bucket(WithdrawalSource),
}

impl std::fmt::Display for FundsSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FundsSource::Balance => f.write_str("balance"),
            FundsSource::Bucket(source) => write!(f, "{} bucket", source.as_str()),
        }
    }
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A foreign key constraint was violated.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// A stored value could not be decoded into its domain type.
    #[error("Corrupt stored value: {0}")]
    Corrupt(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Rejections of a lifecycle transition.
#[derive(Error, Debug)]
pub enum StateTransitionError {
    #[error("investment {investment_id} is already {status}")]
    AlreadySettled {
        investment_id: String,
        status: String,
    },

    #[error("request {request_id} is already {status}")]
    AlreadyResolved { request_id: String, status: String },
}

/// Validation errors for user input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("{field} is below minimum {label} of {minimum}")]
    BelowMinimum {
        field: String,
        label: String,
        minimum: Decimal,
    },

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
