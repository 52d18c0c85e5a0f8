//! Ledger accounts - balances, deposits and withdrawal passwords.

mod accounts_model;
mod accounts_service;
mod accounts_traits;
mod withdrawal_password;


// Re-export the public interface
pub use accounts_model::{LedgerAccount, NewLedgerAccount};
pub use accounts_service::AccountService;
pub use accounts_traits::{AccountServiceTrait, LedgerRepositoryTrait};
pub use withdrawal_password::{hash_withdrawal_password, verify_withdrawal_password};
