//! Value accrual for fixed-term investments.
//!
//! Every "what is this investment worth now" question in the system goes
//! through these functions: the read path, claims, the scheduled refresh and
//! the dashboard summary. They are pure; time comes in as an argument.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::investments_model::{Investment, InvestmentValuation};
use crate::utils::whole_days_between;

/// Whole days of growth credited at `now`.
///
/// At least one day is credited from the moment of creation, and a `now`
/// earlier than `start_date` (clock skew) also yields one.
pub fn days_elapsed(start_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    whole_days_between(start_date, now).max(1)
}

/// The instant growth is measured at: `now`, but never past the end of the term.
pub fn valuation_instant(investment: &Investment, now: DateTime<Utc>) -> DateTime<Utc> {
    now.min(investment.end_date)
}

/// `min(principal + principal * rate / 100 * days, final_value_cap)`, where
/// `days` stops counting at `end_date`.
pub fn calculate_current_value(investment: &Investment, now: DateTime<Utc>) -> Decimal {
    let days = Decimal::from(days_elapsed(
        investment.start_date,
        valuation_instant(investment, now),
    ));
    let growth = investment
        .principal
        .checked_mul(investment.daily_growth_rate)
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .and_then(|daily| daily.checked_mul(days))
        .and_then(|g| investment.principal.checked_add(g));

    match growth {
        Some(raw) => raw.min(investment.final_value_cap),
        // Overflow only happens far beyond any cap.
        None => investment.final_value_cap,
    }
}

/// Accrued profit not yet credited to the account.
///
/// May be zero or negative; callers treat anything `<= 0` as nothing to claim.
pub fn calculate_claimable_profit(investment: &Investment, now: DateTime<Utc>) -> Decimal {
    calculate_current_value(investment, now) - investment.principal - investment.claimed_profit
}

/// True once the value reached its cap or the term ended.
pub fn is_matured(investment: &Investment, now: DateTime<Utc>) -> bool {
    now >= investment.end_date
        || calculate_current_value(investment, now) >= investment.final_value_cap
}

/// Live figures for an active investment. A settled one reports its stored
/// value with nothing left to claim.
pub fn value_investment(investment: &Investment, now: DateTime<Utc>) -> InvestmentValuation {
    if !investment.is_active() {
        return InvestmentValuation {
            investment_id: investment.id.clone(),
            as_of: now,
            days_elapsed: days_elapsed(investment.start_date, valuation_instant(investment, now)),
            current_value: investment.current_value,
            claimable_profit: Decimal::ZERO,
            is_matured: true,
        };
    }

    let current_value = calculate_current_value(investment, now);
    InvestmentValuation {
        investment_id: investment.id.clone(),
        as_of: now,
        days_elapsed: days_elapsed(investment.start_date, valuation_instant(investment, now)),
        current_value,
        claimable_profit: (current_value - investment.principal - investment.claimed_profit)
            .max(Decimal::ZERO),
        is_matured: now >= investment.end_date || current_value >= investment.final_value_cap,
    }
}
