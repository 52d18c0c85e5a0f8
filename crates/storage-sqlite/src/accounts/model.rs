//! Database model for ledger accounts.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use tenorvest_core::accounts::LedgerAccount;

use crate::errors::StorageError;
use crate::utils::{decimal_to_text, from_naive, parse_decimal, to_naive};

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::ledger_accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct LedgerAccountDB {
    pub id: String,
    pub referred_by: Option<String>,
    pub balance: String,
    pub total_invested: String,
    pub total_withdrawn: String,
    pub referral_bonus: String,
    pub escrowed_amount: String,
    pub withdrawal_password_hash: Option<String>,
    pub version: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<LedgerAccountDB> for LedgerAccount {
    type Error = StorageError;

    fn try_from(db: LedgerAccountDB) -> Result<Self, Self::Error> {
        Ok(Self {
            balance: parse_decimal(&db.balance, "ledger_accounts.balance")?,
            total_invested: parse_decimal(&db.total_invested, "ledger_accounts.total_invested")?,
            total_withdrawn: parse_decimal(&db.total_withdrawn, "ledger_accounts.total_withdrawn")?,
            referral_bonus: parse_decimal(&db.referral_bonus, "ledger_accounts.referral_bonus")?,
            escrowed_amount: parse_decimal(&db.escrowed_amount, "ledger_accounts.escrowed_amount")?,
            id: db.id,
            referred_by: db.referred_by,
            withdrawal_password_hash: db.withdrawal_password_hash,
            version: db.version,
            created_at: from_naive(db.created_at),
            updated_at: from_naive(db.updated_at),
        })
    }
}

impl From<&LedgerAccount> for LedgerAccountDB {
    fn from(domain: &LedgerAccount) -> Self {
        Self {
            id: domain.id.clone(),
            referred_by: domain.referred_by.clone(),
            balance: decimal_to_text(domain.balance),
            total_invested: decimal_to_text(domain.total_invested),
            total_withdrawn: decimal_to_text(domain.total_withdrawn),
            referral_bonus: decimal_to_text(domain.referral_bonus),
            escrowed_amount: decimal_to_text(domain.escrowed_amount),
            withdrawal_password_hash: domain.withdrawal_password_hash.clone(),
            version: domain.version,
            created_at: to_naive(domain.created_at),
            updated_at: to_naive(domain.updated_at),
        }
    }
}
