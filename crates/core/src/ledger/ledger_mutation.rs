use chrono::{DateTime, Utc};

use crate::accounts::LedgerAccount;
use crate::errors::Result;
use crate::investments::Investment;
use crate::transactions::{Transaction, TransactionStatus};
use crate::withdrawals::WithdrawalRequest;

/// A row to write.
///
/// `Update` carries the row as read plus the caller's changes; its `version`
/// field is the version the store must still hold for the write to apply.
/// The store bumps the version itself.
#[derive(Debug, Clone, PartialEq)]
pub enum RowWrite<T> {
    Insert(T),
    Update(T),
}

impl<T> RowWrite<T> {
    pub fn row(&self) -> &T {
        match self {
            RowWrite::Insert(row) | RowWrite::Update(row) => row,
        }
    }
}

/// Moves a pending transaction to a terminal status.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionStatusUpdate {
    pub transaction_id: String,
    pub status: TransactionStatus,
    pub note: Option<String>,
    pub resolved_at: DateTime<Utc>,
}

/// Everything one operation changes, applied all-or-nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerMutation {
    pub accounts: Vec<RowWrite<LedgerAccount>>,
    pub investment: Option<RowWrite<Investment>>,
    pub withdrawal: Option<RowWrite<WithdrawalRequest>>,
    pub transaction_update: Option<TransactionStatusUpdate>,
    pub appended: Vec<Transaction>,
}

impl LedgerMutation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_account(mut self, account: LedgerAccount) -> Self {
        self.accounts.push(RowWrite::Insert(account));
        self
    }

    pub fn update_account(mut self, account: LedgerAccount) -> Self {
        self.accounts.push(RowWrite::Update(account));
        self
    }

    pub fn insert_investment(mut self, investment: Investment) -> Self {
        self.investment = Some(RowWrite::Insert(investment));
        self
    }

    pub fn update_investment(mut self, investment: Investment) -> Self {
        self.investment = Some(RowWrite::Update(investment));
        self
    }

    pub fn insert_withdrawal(mut self, request: WithdrawalRequest) -> Self {
        self.withdrawal = Some(RowWrite::Insert(request));
        self
    }

    pub fn update_withdrawal(mut self, request: WithdrawalRequest) -> Self {
        self.withdrawal = Some(RowWrite::Update(request));
        self
    }

    pub fn resolve_transaction(mut self, update: TransactionStatusUpdate) -> Self {
        self.transaction_update = Some(update);
        self
    }

    pub fn append(mut self, transaction: Transaction) -> Self {
        self.appended.push(transaction);
        self
    }

    /// Refuses mutations that would leave an account with a negative balance,
    /// bonus or escrow.
    pub fn check_invariants(&self) -> Result<()> {
        for write in &self.accounts {
            write.row().check_invariants()?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
            && self.investment.is_none()
            && self.withdrawal.is_none()
            && self.transaction_update.is_none()
            && self.appended.is_empty()
    }
}
