//! Tenorvest Core - accrual, claim and withdrawal engine.
//!
//! This crate holds the domain models, services and repository traits. It is
//! database-agnostic; the `storage-sqlite` crate implements the traits.

pub mod accounts;
pub mod constants;
pub mod errors;
pub mod investments;
pub mod ledger;
pub mod settings;
pub mod transactions;
pub mod utils;
pub mod withdrawals;

#[cfg(test)]
mod test_support;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
