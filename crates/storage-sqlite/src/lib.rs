//! SQLite storage implementation for Tenorvest.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `tenorvest-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for accounts, investments and withdrawals
//! - The version-checked ledger writer
//!
//! Reads go through the r2d2 pool. Every write goes through one actor that
//! owns a single connection and runs each job in an immediate transaction.

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod accounts;
pub mod investments;
pub mod ledger;
pub mod transactions;
pub mod withdrawals;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, open, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

pub use accounts::LedgerRepository;
pub use investments::InvestmentRepository;
pub use ledger::LedgerWriter;
pub use withdrawals::WithdrawalRepository;

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from tenorvest-core for convenience
pub use tenorvest_core::errors::{DatabaseError, Error, Result};
