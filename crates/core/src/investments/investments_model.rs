//! Investment and product domain models.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_PRODUCT_DURATION_DAYS;
use crate::errors::{Error, Result, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentStatus {
    Active,
    Completed,
    Cancelled,
}

impl InvestmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvestmentStatus::Active => "active",
            InvestmentStatus::Completed => "completed",
            InvestmentStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for InvestmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvestmentStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(InvestmentStatus::Active),
            "completed" => Ok(InvestmentStatus::Completed),
            "cancelled" => Ok(InvestmentStatus::Cancelled),
            other => Err(ValidationError::InvalidInput(format!(
                "unknown investment status '{}'",
                other
            ))
            .into()),
        }
    }
}

/// A principal placed into a product, accruing daily toward a fixed cap.
///
/// Rate, cap and dates are snapshotted from the product at creation and never
/// follow later product edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: String,
    pub account_id: String,
    pub product_id: String,
    pub principal: Decimal,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Percent of principal added per elapsed day.
    pub daily_growth_rate: Decimal,
    pub final_value_cap: Decimal,
    /// Last value persisted by the accrual job or a claim.
    pub current_value: Decimal,
    /// Profit credited to the account so far.
    pub claimed_profit: Decimal,
    pub status: InvestmentStatus,
    pub last_profit_claim_date: DateTime<Utc>,
    pub version: i64,
}

impl Investment {
    pub fn is_active(&self) -> bool {
        self.status == InvestmentStatus::Active
    }
}

/// A purchasable fixed-term plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentProduct {
    pub id: String,
    pub name: String,
    /// Fixed principal of every investment in this product.
    pub ticket_size: Decimal,
    pub daily_growth_rate: Decimal,
    pub duration_days: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInvestmentProduct {
    pub id: Option<String>,
    pub name: String,
    pub ticket_size: Decimal,
    pub daily_growth_rate: Decimal,
    pub duration_days: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl NewInvestmentProduct {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Product name cannot be empty".to_string(),
            )));
        }
        if self.ticket_size <= Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Ticket size must be positive, got {}",
                self.ticket_size
            ))));
        }
        validate_growth_rate(self.daily_growth_rate)?;
        if !(1..=MAX_PRODUCT_DURATION_DAYS).contains(&self.duration_days) {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Duration must be between 1 and {} days, got {}",
                MAX_PRODUCT_DURATION_DAYS, self.duration_days
            ))));
        }
        Ok(())
    }
}

/// Zero or negative rates are refused before an investment exists, so the
/// accrual engine never has to handle them.
pub fn validate_growth_rate(rate: Decimal) -> Result<()> {
    if rate <= Decimal::ZERO {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Daily growth rate must be positive, got {}",
            rate
        ))));
    }
    Ok(())
}

/// Live figures for one investment at a given instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentValuation {
    pub investment_id: String,
    pub as_of: DateTime<Utc>,
    pub days_elapsed: i64,
    pub current_value: Decimal,
    pub claimable_profit: Decimal,
    pub is_matured: bool,
}

/// Result of a successful profit claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimReceipt {
    pub investment_id: String,
    pub claimed_amount: Decimal,
    pub transaction_id: String,
    pub claimed_at: DateTime<Utc>,
    pub new_balance: Decimal,
}

/// Dashboard totals over an account's active investments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentSummary {
    pub account_id: String,
    pub active_count: usize,
    pub active_principal: Decimal,
    pub current_value: Decimal,
    pub claimable_profit: Decimal,
}
