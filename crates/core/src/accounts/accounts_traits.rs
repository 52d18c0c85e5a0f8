//! Ledger account repository and service traits.
//!
//! These traits define the contract for account operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;

use super::accounts_model::{LedgerAccount, NewLedgerAccount};
use crate::errors::Result;
use crate::transactions::{DepositDecision, NewDeposit, Transaction};

/// Read access to accounts and their transaction log.
///
/// Writes go through [`crate::ledger::LedgerWriterTrait`].
pub trait LedgerRepositoryTrait: Send + Sync {
    /// Retrieves an account by its ID, `Error::NotFound` when unknown.
    fn get_account(&self, account_id: &str) -> Result<LedgerAccount>;

    fn list_accounts(&self) -> Result<Vec<LedgerAccount>>;

    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction>;

    /// Transactions of one account, newest first.
    fn list_transactions(&self, account_id: &str) -> Result<Vec<Transaction>>;

    /// Deposits awaiting admin review, oldest first.
    fn list_pending_deposits(&self) -> Result<Vec<Transaction>>;
}

/// Account-level operations exposed to the application.
#[async_trait]
pub trait AccountServiceTrait: Send + Sync {
    /// Opens a zero-balance account. A referrer, when given, must exist.
    async fn create_account(&self, new_account: NewLedgerAccount) -> Result<LedgerAccount>;

    fn get_account(&self, account_id: &str) -> Result<LedgerAccount>;

    /// Sets or replaces the withdrawal password. Replacing one requires the
    /// current password.
    async fn set_withdrawal_password(
        &self,
        account_id: &str,
        current_password: Option<String>,
        new_password: String,
    ) -> Result<()>;

    /// Records a deposit as pending until an administrator confirms it.
    async fn submit_deposit(&self, account_id: &str, deposit: NewDeposit) -> Result<Transaction>;

    /// Confirms or rejects a pending deposit, exactly once.
    async fn resolve_deposit(
        &self,
        transaction_id: &str,
        decision: DepositDecision,
    ) -> Result<Transaction>;

    fn list_pending_deposits(&self) -> Result<Vec<Transaction>>;

    fn list_transactions(&self, account_id: &str) -> Result<Vec<Transaction>>;
}
