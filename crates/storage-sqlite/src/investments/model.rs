//! Database models for products and investments.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use tenorvest_core::investments::{Investment, InvestmentProduct};

use crate::errors::StorageError;
use crate::utils::{decimal_to_text, from_naive, parse_decimal, parse_enum, to_naive};

#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProductDB {
    pub id: String,
    pub name: String,
    pub ticket_size: String,
    pub daily_growth_rate: String,
    pub duration_days: i64,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

impl TryFrom<ProductDB> for InvestmentProduct {
    type Error = StorageError;

    fn try_from(db: ProductDB) -> Result<Self, Self::Error> {
        Ok(Self {
            ticket_size: parse_decimal(&db.ticket_size, "products.ticket_size")?,
            daily_growth_rate: parse_decimal(&db.daily_growth_rate, "products.daily_growth_rate")?,
            id: db.id,
            name: db.name,
            duration_days: db.duration_days,
            is_active: db.is_active,
            created_at: from_naive(db.created_at),
        })
    }
}

impl From<&InvestmentProduct> for ProductDB {
    fn from(domain: &InvestmentProduct) -> Self {
        Self {
            id: domain.id.clone(),
            name: domain.name.clone(),
            ticket_size: decimal_to_text(domain.ticket_size),
            daily_growth_rate: decimal_to_text(domain.daily_growth_rate),
            duration_days: domain.duration_days,
            is_active: domain.is_active,
            created_at: to_naive(domain.created_at),
        }
    }
}

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::investments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InvestmentDB {
    pub id: String,
    pub account_id: String,
    pub product_id: String,
    pub principal: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub daily_growth_rate: String,
    pub final_value_cap: String,
    pub current_value: String,
    pub claimed_profit: String,
    pub status: String,
    pub last_profit_claim_date: NaiveDateTime,
    pub version: i64,
}

impl TryFrom<InvestmentDB> for Investment {
    type Error = StorageError;

    fn try_from(db: InvestmentDB) -> Result<Self, Self::Error> {
        Ok(Self {
            principal: parse_decimal(&db.principal, "investments.principal")?,
            daily_growth_rate: parse_decimal(&db.daily_growth_rate, "investments.daily_growth_rate")?,
            final_value_cap: parse_decimal(&db.final_value_cap, "investments.final_value_cap")?,
            current_value: parse_decimal(&db.current_value, "investments.current_value")?,
            claimed_profit: parse_decimal(&db.claimed_profit, "investments.claimed_profit")?,
            status: parse_enum(&db.status, "investments.status")?,
            id: db.id,
            account_id: db.account_id,
            product_id: db.product_id,
            start_date: from_naive(db.start_date),
            end_date: from_naive(db.end_date),
            last_profit_claim_date: from_naive(db.last_profit_claim_date),
            version: db.version,
        })
    }
}

impl From<&Investment> for InvestmentDB {
    fn from(domain: &Investment) -> Self {
        Self {
            id: domain.id.clone(),
            account_id: domain.account_id.clone(),
            product_id: domain.product_id.clone(),
            principal: decimal_to_text(domain.principal),
            start_date: to_naive(domain.start_date),
            end_date: to_naive(domain.end_date),
            daily_growth_rate: decimal_to_text(domain.daily_growth_rate),
            final_value_cap: decimal_to_text(domain.final_value_cap),
            current_value: decimal_to_text(domain.current_value),
            claimed_profit: decimal_to_text(domain.claimed_profit),
            status: domain.status.as_str().to_string(),
            last_profit_claim_date: to_naive(domain.last_profit_claim_date),
            version: domain.version,
        }
    }
}
