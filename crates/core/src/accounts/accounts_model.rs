//! Ledger account domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, FundsSource, Result, ValidationError};

/// Per-user balances.
///
/// `balance` is spendable money. `escrowed_amount` is the sum locked by
/// pending withdrawal requests and is never part of `balance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerAccount {
    pub id: String,
    /// Account that referred this one, credited a bonus on approved deposits.
    pub referred_by: Option<String>,
    pub balance: Decimal,
    /// Sum of principal ever invested. Never decremented.
    pub total_invested: Decimal,
    /// Sum of settled withdrawals. Never decremented.
    pub total_withdrawn: Decimal,
    pub referral_bonus: Decimal,
    pub escrowed_amount: Decimal,
    /// Argon2 PHC string; `None` when no withdrawal password is configured.
    #[serde(skip_serializing)]
    pub withdrawal_password_hash: Option<String>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LedgerAccount {
    pub fn new(id: String, referred_by: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            referred_by,
            balance: Decimal::ZERO,
            total_invested: Decimal::ZERO,
            total_withdrawn: Decimal::ZERO,
            referral_bonus: Decimal::ZERO,
            escrowed_amount: Decimal::ZERO,
            withdrawal_password_hash: None,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// The configured withdrawal password hash; a blank column counts as unset.
    pub fn withdrawal_password(&self) -> Option<&str> {
        self.withdrawal_password_hash
            .as_deref()
            .filter(|h| !h.is_empty())
    }

    pub fn has_withdrawal_password(&self) -> bool {
        self.withdrawal_password().is_some()
    }

    pub fn credit_balance(&mut self, amount: Decimal) {
        self.balance += amount;
    }

    /// Removes `amount` from `balance`, refusing to go negative.
    pub fn debit_balance(&mut self, amount: Decimal) -> Result<()> {
        if amount > self.balance {
            return Err(Error::InsufficientFunds {
                bucket: FundsSource::Balance,
                requested: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    /// Checks the non-negativity invariants after a planned change.
    pub fn check_invariants(&self) -> Result<()> {
        let fields = [
            ("balance", self.balance),
            ("referral bonus", self.referral_bonus),
            ("escrowed amount", self.escrowed_amount),
        ];
        for (name, value) in fields {
            if value.is_sign_negative() && !value.is_zero() {
                return Err(Error::Unexpected(format!(
                    "account {} would end with negative {} ({})",
                    self.id, name, value
                )));
            }
        }
        Ok(())
    }
}

/// Input model for opening a new account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLedgerAccount {
    /// Caller-chosen id (e.g. the identity provider's user id). Generated when absent.
    pub id: Option<String>,
    pub referred_by: Option<String>,
}

impl NewLedgerAccount {
    pub fn validate(&self) -> Result<()> {
        if let Some(id) = &self.id {
            if id.trim().is_empty() {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Account id cannot be blank".to_string(),
                )));
            }
        }
        if let (Some(id), Some(referrer)) = (&self.id, &self.referred_by) {
            if id == referrer {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "An account cannot refer itself".to_string(),
                )));
            }
        }
        Ok(())
    }
}
