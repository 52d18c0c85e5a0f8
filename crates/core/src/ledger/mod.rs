//! The transactional write primitive shared by every mutating service.
//!
//! Services read rows, plan the full change as a [`LedgerMutation`] and hand
//! it to a [`LedgerWriterTrait`] implementation, which applies it atomically
//! with optimistic version checks.

mod ledger_mutation;
mod ledger_traits;

pub use ledger_mutation::{LedgerMutation, RowWrite, TransactionStatusUpdate};
pub use ledger_traits::{retry_on_conflict, LedgerWriterTrait};
