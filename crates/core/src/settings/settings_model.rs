use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_FINAL_VALUE_MULTIPLIER, DEFAULT_MINIMUM_WITHDRAWAL};
use crate::errors::{Result, ValidationError};

/// Tunables shared by every service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    pub minimum_withdrawal: Decimal,
    /// Percent of a withdrawal recorded as fee. The escrowed amount is not reduced by it.
    pub withdrawal_fee_percent: Decimal,
    /// Percent of an approved deposit credited to the depositor's referrer.
    pub referral_bonus_percent: Decimal,
    pub final_value_multiplier: Decimal,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            minimum_withdrawal: DEFAULT_MINIMUM_WITHDRAWAL,
            withdrawal_fee_percent: Decimal::ZERO,
            referral_bonus_percent: Decimal::ZERO,
            final_value_multiplier: DEFAULT_FINAL_VALUE_MULTIPLIER,
        }
    }
}

impl EngineSettings {
    pub fn validate(&self) -> Result<()> {
        if self.minimum_withdrawal.is_sign_negative() {
            return Err(ValidationError::InvalidInput(
                "minimum withdrawal cannot be negative".to_string(),
            )
            .into());
        }
        for (name, pct) in [
            ("withdrawal fee percent", self.withdrawal_fee_percent),
            ("referral bonus percent", self.referral_bonus_percent),
        ] {
            if pct.is_sign_negative() || pct > Decimal::ONE_HUNDRED {
                return Err(ValidationError::InvalidInput(format!(
                    "{} must be between 0 and 100, got {}",
                    name, pct
                ))
                .into());
            }
        }
        if self.final_value_multiplier < Decimal::ONE {
            return Err(ValidationError::InvalidInput(format!(
                "final value multiplier must be at least 1, got {}",
                self.final_value_multiplier
            ))
            .into());
        }
        Ok(())
    }
}
