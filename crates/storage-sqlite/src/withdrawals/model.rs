//! Database model for withdrawal requests.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use tenorvest_core::withdrawals::WithdrawalRequest;

use crate::errors::StorageError;
use crate::utils::{decimal_to_text, from_naive, parse_decimal, parse_enum, to_naive};

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::withdrawal_requests)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct WithdrawalRequestDB {
    pub id: String,
    pub account_id: String,
    pub amount: String,
    pub source: String,
    pub destination_address: String,
    pub fee_amount: String,
    pub status: String,
    pub tx_reference: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: NaiveDateTime,
    pub resolved_at: Option<NaiveDateTime>,
    pub version: i64,
}

impl TryFrom<WithdrawalRequestDB> for WithdrawalRequest {
    type Error = StorageError;

    fn try_from(db: WithdrawalRequestDB) -> Result<Self, Self::Error> {
        Ok(Self {
            amount: parse_decimal(&db.amount, "withdrawal_requests.amount")?,
            fee_amount: parse_decimal(&db.fee_amount, "withdrawal_requests.fee_amount")?,
            source: parse_enum(&db.source, "withdrawal_requests.source")?,
            status: parse_enum(&db.status, "withdrawal_requests.status")?,
            id: db.id,
            account_id: db.account_id,
            destination_address: db.destination_address,
            tx_reference: db.tx_reference,
            rejection_reason: db.rejection_reason,
            created_at: from_naive(db.created_at),
            resolved_at: db.resolved_at.map(from_naive),
            version: db.version,
        })
    }
}

impl From<&WithdrawalRequest> for WithdrawalRequestDB {
    fn from(domain: &WithdrawalRequest) -> Self {
        Self {
            id: domain.id.clone(),
            account_id: domain.account_id.clone(),
            amount: decimal_to_text(domain.amount),
            source: domain.source.as_str().to_string(),
            destination_address: domain.destination_address.clone(),
            fee_amount: decimal_to_text(domain.fee_amount),
            status: domain.status.as_str().to_string(),
            tx_reference: domain.tx_reference.clone(),
            rejection_reason: domain.rejection_reason.clone(),
            created_at: to_naive(domain.created_at),
            resolved_at: domain.resolved_at.map(to_naive),
            version: domain.version,
        }
    }
}
