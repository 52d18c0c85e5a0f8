//! Atomic, version-checked application of a [`LedgerMutation`].

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;

use tenorvest_core::errors::{Error, Result};
use tenorvest_core::ledger::{LedgerMutation, LedgerWriterTrait, RowWrite, TransactionStatusUpdate};
use tenorvest_core::transactions::TransactionStatus;

use crate::accounts::LedgerAccountDB;
use crate::db::WriteHandle;
use crate::errors::StorageError;
use crate::investments::InvestmentDB;
use crate::schema::{investments, ledger_accounts, ledger_transactions, withdrawal_requests};
use crate::transactions::TransactionDB;
use crate::utils::to_naive;
use crate::withdrawals::WithdrawalRequestDB;

/// Commits mutations through the single writer connection.
pub struct LedgerWriter {
    writer: WriteHandle,
}

impl LedgerWriter {
    pub fn new(writer: WriteHandle) -> Self {
        Self { writer }
    }
}

#[async_trait]
impl LedgerWriterTrait for LedgerWriter {
    async fn commit(&self, mutation: LedgerMutation) -> Result<()> {
        if mutation.is_empty() {
            return Ok(());
        }
        self.writer
            .exec(move |conn: &mut SqliteConnection| apply_mutation(conn, mutation))
            .await
    }
}

fn stale_or_missing(found: bool, kind: &str, id: &str, expected: i64) -> Error {
    if found {
        Error::ConcurrencyConflict(format!(
            "{} {} changed since version {}",
            kind, id, expected
        ))
    } else {
        Error::NotFound(format!("{} {}", kind, id))
    }
}

fn apply_mutation(conn: &mut SqliteConnection, mutation: LedgerMutation) -> Result<()> {
    for write in &mutation.accounts {
        write_account(conn, write)?;
    }
    if let Some(write) = &mutation.investment {
        write_investment(conn, write)?;
    }
    if let Some(write) = &mutation.withdrawal {
        write_withdrawal(conn, write)?;
    }
    if let Some(update) = &mutation.transaction_update {
        resolve_transaction(conn, update)?;
    }
    if !mutation.appended.is_empty() {
        let rows: Vec<TransactionDB> = mutation.appended.iter().map(TransactionDB::from).collect();
        diesel::insert_into(ledger_transactions::table)
            .values(&rows)
            .execute(conn)
            .map_err(StorageError::from)?;
    }
    debug!(
        "Committed ledger mutation: {} account writes, {} transactions appended",
        mutation.accounts.len(),
        mutation.appended.len()
    );
    Ok(())
}

fn write_account(
    conn: &mut SqliteConnection,
    write: &RowWrite<tenorvest_core::accounts::LedgerAccount>,
) -> Result<()> {
    let mut row = LedgerAccountDB::from(write.row());
    match write {
        RowWrite::Insert(_) => {
            diesel::insert_into(ledger_accounts::table)
                .values(&row)
                .execute(conn)
                .map_err(StorageError::from)?;
        }
        RowWrite::Update(_) => {
            let expected = row.version;
            row.version = expected + 1;
            let updated = diesel::update(
                ledger_accounts::table
                    .filter(ledger_accounts::id.eq(&row.id))
                    .filter(ledger_accounts::version.eq(expected)),
            )
            .set(&row)
            .execute(conn)
            .map_err(StorageError::from)?;
            if updated == 0 {
                let found = diesel::select(exists(ledger_accounts::table.find(&row.id)))
                    .get_result::<bool>(conn)
                    .map_err(StorageError::from)?;
                return Err(stale_or_missing(found, "account", &row.id, expected));
            }
        }
    }
    Ok(())
}

fn write_investment(
    conn: &mut SqliteConnection,
    write: &RowWrite<tenorvest_core::investments::Investment>,
) -> Result<()> {
    let mut row = InvestmentDB::from(write.row());
    match write {
        RowWrite::Insert(_) => {
            diesel::insert_into(investments::table)
                .values(&row)
                .execute(conn)
                .map_err(StorageError::from)?;
        }
        RowWrite::Update(_) => {
            let expected = row.version;
            row.version = expected + 1;
            let updated = diesel::update(
                investments::table
                    .filter(investments::id.eq(&row.id))
                    .filter(investments::version.eq(expected)),
            )
            .set(&row)
            .execute(conn)
            .map_err(StorageError::from)?;
            if updated == 0 {
                let found = diesel::select(exists(investments::table.find(&row.id)))
                    .get_result::<bool>(conn)
                    .map_err(StorageError::from)?;
                return Err(stale_or_missing(found, "investment", &row.id, expected));
            }
        }
    }
    Ok(())
}

fn write_withdrawal(
    conn: &mut SqliteConnection,
    write: &RowWrite<tenorvest_core::withdrawals::WithdrawalRequest>,
) -> Result<()> {
    let mut row = WithdrawalRequestDB::from(write.row());
    match write {
        RowWrite::Insert(_) => {
            diesel::insert_into(withdrawal_requests::table)
                .values(&row)
                .execute(conn)
                .map_err(StorageError::from)?;
        }
        RowWrite::Update(_) => {
            let expected = row.version;
            row.version = expected + 1;
            let updated = diesel::update(
                withdrawal_requests::table
                    .filter(withdrawal_requests::id.eq(&row.id))
                    .filter(withdrawal_requests::version.eq(expected)),
            )
            .set(&row)
            .execute(conn)
            .map_err(StorageError::from)?;
            if updated == 0 {
                let found = diesel::select(exists(withdrawal_requests::table.find(&row.id)))
                    .get_result::<bool>(conn)
                    .map_err(StorageError::from)?;
                return Err(stale_or_missing(
                    found,
                    "withdrawal request",
                    &row.id,
                    expected,
                ));
            }
        }
    }
    Ok(())
}

/// Only a still-pending transaction may be resolved.
fn resolve_transaction(conn: &mut SqliteConnection, update: &TransactionStatusUpdate) -> Result<()> {
    let pending = TransactionStatus::Pending.as_str();
    let updated = diesel::update(
        ledger_transactions::table
            .filter(ledger_transactions::id.eq(&update.transaction_id))
            .filter(ledger_transactions::status.eq(pending)),
    )
    .set((
        ledger_transactions::status.eq(update.status.as_str()),
        ledger_transactions::note.eq(update.note.as_deref()),
        ledger_transactions::resolved_at.eq(Some(to_naive(update.resolved_at))),
    ))
    .execute(conn)
    .map_err(StorageError::from)?;

    if updated == 0 {
        let found = diesel::select(exists(
            ledger_transactions::table.find(&update.transaction_id),
        ))
        .get_result::<bool>(conn)
        .map_err(StorageError::from)?;
        return Err(if found {
            Error::ConcurrencyConflict(format!(
                "transaction {} is no longer pending",
                update.transaction_id
            ))
        } else {
            Error::NotFound(format!("transaction {}", update.transaction_id))
        });
    }
    Ok(())
}
