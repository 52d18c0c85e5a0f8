use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Smallest amount a withdrawal request may ask for.
pub const DEFAULT_MINIMUM_WITHDRAWAL: Decimal = dec!(10);

/// `final_value_cap = principal * DEFAULT_FINAL_VALUE_MULTIPLIER`
pub const DEFAULT_FINAL_VALUE_MULTIPLIER: Decimal = dec!(2);

/// Decimal places kept for fees and referral bonuses
pub const MONEY_DECIMAL_PRECISION: u32 = 2;

/// Longest term a product may offer, in days.
pub const MAX_PRODUCT_DURATION_DAYS: i64 = 36_500;
