//! Column encoding helpers.
//!
//! Money and rates are stored as decimal TEXT; instants as naive UTC timestamps.

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;

use crate::errors::StorageError;

pub fn decimal_to_text(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Strict decimal parsing. A stored amount that does not parse is corruption,
/// never zero.
pub fn parse_decimal(value: &str, column: &str) -> Result<Decimal, StorageError> {
    Decimal::from_str(value)
        .map_err(|e| StorageError::Corrupt(format!("{} = '{}': {}", column, value, e)))
}

pub fn to_naive(value: DateTime<Utc>) -> NaiveDateTime {
    value.naive_utc()
}

pub fn from_naive(value: NaiveDateTime) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(value, Utc)
}

/// Parses a status/kind column through the domain `FromStr`.
pub fn parse_enum<T>(value: &str, column: &str) -> Result<T, StorageError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    T::from_str(value)
        .map_err(|e| StorageError::Corrupt(format!("{} = '{}': {}", column, value, e)))
}
