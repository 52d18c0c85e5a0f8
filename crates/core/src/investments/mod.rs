//! Investments - products, value accrual, profit claims and the scheduled refresh.

pub mod accrual_calculator;
mod accrual_service;
mod investments_model;
mod investments_service;
mod investments_traits;

#[cfg(test)]
mod investments_service_tests;

pub use accrual_calculator::{
    calculate_claimable_profit, calculate_current_value, days_elapsed, is_matured,
    valuation_instant, value_investment,
};
pub use accrual_service::{AccrualRunReport, AccrualService, AccrualServiceTrait};
pub use investments_model::*;
pub use investments_service::InvestmentService;
pub use investments_traits::{InvestmentRepositoryTrait, InvestmentServiceTrait};
