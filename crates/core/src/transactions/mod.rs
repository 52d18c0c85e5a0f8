//! Append-only ledger entries.

mod transactions_model;

pub use transactions_model::{
    DepositDecision, NewDeposit, Transaction, TransactionStatus, TransactionType,
};
