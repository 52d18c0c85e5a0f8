use std::sync::Arc;

use diesel::prelude::*;

use tenorvest_core::accounts::{LedgerAccount, LedgerRepositoryTrait};
use tenorvest_core::transactions::{Transaction, TransactionStatus, TransactionType};
use tenorvest_core::Result;

use super::model::LedgerAccountDB;
use crate::db::{get_connection, DbPool};
use crate::errors::{IntoCore, OrNotFound};
use crate::schema::{ledger_accounts, ledger_transactions};
use crate::transactions::TransactionDB;

/// Read side of accounts and the transaction log.
pub struct LedgerRepository {
    pool: Arc<DbPool>,
}

impl LedgerRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

fn into_transactions(rows: Vec<TransactionDB>) -> Result<Vec<Transaction>> {
    rows.into_iter()
        .map(|row| Transaction::try_from(row).map_err(Into::into))
        .collect()
}

impl LedgerRepositoryTrait for LedgerRepository {
    fn get_account(&self, account_id: &str) -> Result<LedgerAccount> {
        let mut conn = get_connection(&self.pool)?;
        let row = ledger_accounts::table
            .find(account_id)
            .select(LedgerAccountDB::as_select())
            .first::<LedgerAccountDB>(&mut conn)
            .or_not_found(|| format!("account {}", account_id))?;
        LedgerAccount::try_from(row).map_err(Into::into)
    }

    fn list_accounts(&self) -> Result<Vec<LedgerAccount>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = ledger_accounts::table
            .select(LedgerAccountDB::as_select())
            .order(ledger_accounts::created_at.asc())
            .load::<LedgerAccountDB>(&mut conn)
            .into_core()?;
        rows.into_iter()
            .map(|row| LedgerAccount::try_from(row).map_err(Into::into))
            .collect()
    }

    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        let mut conn = get_connection(&self.pool)?;
        let row = ledger_transactions::table
            .find(transaction_id)
            .select(TransactionDB::as_select())
            .first::<TransactionDB>(&mut conn)
            .or_not_found(|| format!("transaction {}", transaction_id))?;
        Transaction::try_from(row).map_err(Into::into)
    }

    fn list_transactions(&self, account_id: &str) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = ledger_transactions::table
            .filter(ledger_transactions::account_id.eq(account_id))
            .select(TransactionDB::as_select())
            .order((ledger_transactions::date.desc(), ledger_transactions::id.desc()))
            .load::<TransactionDB>(&mut conn)
            .into_core()?;
        into_transactions(rows)
    }

    fn list_pending_deposits(&self) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = ledger_transactions::table
            .filter(ledger_transactions::transaction_type.eq(TransactionType::Deposit.as_str()))
            .filter(ledger_transactions::status.eq(TransactionStatus::Pending.as_str()))
            .select(TransactionDB::as_select())
            .order(ledger_transactions::date.asc())
            .load::<TransactionDB>(&mut conn)
            .into_core()?;
        into_transactions(rows)
    }
}
