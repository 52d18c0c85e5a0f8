use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Error, Result, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Investment,
    Return,
    Referral,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdrawal",
            TransactionType::Investment => "investment",
            TransactionType::Return => "return",
            TransactionType::Referral => "referral",
        }
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "deposit" => Ok(TransactionType::Deposit),
            "withdrawal" => Ok(TransactionType::Withdrawal),
            "investment" => Ok(TransactionType::Investment),
            "return" => Ok(TransactionType::Return),
            "referral" => Ok(TransactionType::Referral),
            other => Err(ValidationError::InvalidInput(format!(
                "unknown transaction type '{}'",
                other
            ))
            .into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Rejected,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransactionStatus::Pending)
    }
}

impl FromStr for TransactionStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "completed" => Ok(TransactionStatus::Completed),
            "rejected" => Ok(TransactionStatus::Rejected),
            other => Err(ValidationError::InvalidInput(format!(
                "unknown transaction status '{}'",
                other
            ))
            .into()),
        }
    }
}

/// One balance-affecting event. `amount` is signed from the account's point
/// of view: credits positive, debits negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub account_id: String,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub status: TransactionStatus,
    /// Related investment / withdrawal id, or the deposit proof reference.
    pub reference: Option<String>,
    /// Rejection reason for rejected deposits.
    pub note: Option<String>,
    pub date: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// A settled entry, as produced by claims, investments, withdrawals and referrals.
    pub fn completed(
        account_id: &str,
        transaction_type: TransactionType,
        amount: Decimal,
        reference: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            account_id: account_id.to_string(),
            transaction_type,
            amount,
            status: TransactionStatus::Completed,
            reference,
            note: None,
            date: now,
            resolved_at: Some(now),
        }
    }

    pub fn pending_deposit(
        account_id: &str,
        amount: Decimal,
        proof_reference: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            account_id: account_id.to_string(),
            transaction_type: TransactionType::Deposit,
            amount,
            status: TransactionStatus::Pending,
            reference: proof_reference,
            note: None,
            date: now,
            resolved_at: None,
        }
    }
}

/// A user's request to add funds, awaiting admin confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeposit {
    pub amount: Decimal,
    /// Where the uploaded payment proof lives.
    pub proof_reference: Option<String>,
}

impl NewDeposit {
    pub fn validate(&self) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "Deposit amount must be positive, got {}",
                self.amount
            ))
            .into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum DepositDecision {
    Approve,
    Reject { reason: String },
}
