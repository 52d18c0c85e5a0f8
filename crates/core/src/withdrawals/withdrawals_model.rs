//! Withdrawal request domain models.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};

/// Which eligibility bucket a withdrawal draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalSource {
    Profit,
    ReferralBonus,
}

impl WithdrawalSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            WithdrawalSource::Profit => "profit",
            WithdrawalSource::ReferralBonus => "referral_bonus",
        }
    }
}

impl FromStr for WithdrawalSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "profit" => Ok(WithdrawalSource::Profit),
            "referral_bonus" => Ok(WithdrawalSource::ReferralBonus),
            other => Err(ValidationError::InvalidInput(format!(
                "unknown withdrawal source '{}'",
                other
            ))
            .into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawalStatus {
    Pending,
    Approved,
    Rejected,
}

impl WithdrawalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WithdrawalStatus::Pending => "pending",
            WithdrawalStatus::Approved => "approved",
            WithdrawalStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, WithdrawalStatus::Pending)
    }
}

impl FromStr for WithdrawalStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(WithdrawalStatus::Pending),
            "approved" => Ok(WithdrawalStatus::Approved),
            "rejected" => Ok(WithdrawalStatus::Rejected),
            other => Err(ValidationError::InvalidInput(format!(
                "unknown withdrawal status '{}'",
                other
            ))
            .into()),
        }
    }
}

/// A request to pay funds out to an external wallet.
///
/// `amount` is snapshotted at submission and escrowed until an administrator
/// resolves the request exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRequest {
    pub id: String,
    pub account_id: String,
    pub amount: Decimal,
    pub source: WithdrawalSource,
    pub destination_address: String,
    pub fee_amount: Decimal,
    pub status: WithdrawalStatus,
    pub tx_reference: Option<String>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub version: i64,
}

/// User input for a withdrawal submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWithdrawalRequest {
    pub amount: Decimal,
    pub source: WithdrawalSource,
    pub destination_address: String,
    /// Plain-text withdrawal password, when the account has one configured.
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
}

/// Administrative outcome for a pending request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum WithdrawalDecision {
    Approve {
        #[serde(rename = "txReference")]
        tx_reference: String,
    },
    Reject {
        reason: String,
    },
}

impl WithdrawalDecision {
    pub fn validate(&self) -> Result<()> {
        match self {
            WithdrawalDecision::Approve { tx_reference } if tx_reference.trim().is_empty() => {
                Err(ValidationError::MissingField("txReference".to_string()).into())
            }
            WithdrawalDecision::Reject { reason } if reason.trim().is_empty() => {
                Err(ValidationError::MissingField("reason".to_string()).into())
            }
            _ => Ok(()),
        }
    }
}

/// The figures a user sees before submitting a withdrawal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityBreakdown {
    pub available_withdrawal: Decimal,
    pub profit_amount: Decimal,
    pub referral_bonus: Decimal,
    pub escrowed_amount: Decimal,
    /// Sum locked by pending requests.
    pub pending_withdrawals: Decimal,
    pub total_withdrawn: Decimal,
}

impl EligibilityBreakdown {
    /// Upper bound for a request drawing from `source`.
    pub fn bucket(&self, source: WithdrawalSource) -> Decimal {
        match source {
            WithdrawalSource::Profit => self.profit_amount,
            WithdrawalSource::ReferralBonus => self.referral_bonus,
        }
    }
}
