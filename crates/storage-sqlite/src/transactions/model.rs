//! Database model for ledger transactions.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use tenorvest_core::transactions::Transaction;

use crate::errors::StorageError;
use crate::utils::{decimal_to_text, from_naive, parse_decimal, parse_enum, to_naive};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::ledger_transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub account_id: String,
    pub transaction_type: String,
    pub amount: String,
    pub status: String,
    pub reference: Option<String>,
    pub note: Option<String>,
    pub date: NaiveDateTime,
    pub resolved_at: Option<NaiveDateTime>,
}

impl TryFrom<TransactionDB> for Transaction {
    type Error = StorageError;

    fn try_from(db: TransactionDB) -> Result<Self, Self::Error> {
        Ok(Self {
            transaction_type: parse_enum(&db.transaction_type, "ledger_transactions.transaction_type")?,
            amount: parse_decimal(&db.amount, "ledger_transactions.amount")?,
            status: parse_enum(&db.status, "ledger_transactions.status")?,
            id: db.id,
            account_id: db.account_id,
            reference: db.reference,
            note: db.note,
            date: from_naive(db.date),
            resolved_at: db.resolved_at.map(from_naive),
        })
    }
}

impl From<&Transaction> for TransactionDB {
    fn from(domain: &Transaction) -> Self {
        Self {
            id: domain.id.clone(),
            account_id: domain.account_id.clone(),
            transaction_type: domain.transaction_type.as_str().to_string(),
            amount: decimal_to_text(domain.amount),
            status: domain.status.as_str().to_string(),
            reference: domain.reference.clone(),
            note: domain.note.clone(),
            date: to_naive(domain.date),
            resolved_at: domain.resolved_at.map(to_naive),
        }
    }
}
