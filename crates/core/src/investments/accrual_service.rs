//! Periodic refresh of cached investment values.
//!
//! A run walks every active investment, stores its current value and moves
//! matured ones to `completed`. Each investment is committed on its own, so
//! one failure never blocks the rest of the batch.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::accrual_calculator::{calculate_current_value, is_matured};
use super::investments_model::InvestmentStatus;
use super::investments_traits::InvestmentRepositoryTrait;
use crate::accounts::LedgerRepositoryTrait;
use crate::errors::Result;
use crate::ledger::{retry_on_conflict, LedgerMutation, LedgerWriterTrait};
use crate::transactions::{Transaction, TransactionType};
use crate::utils::Clock;

/// What one accrual run did.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccrualRunReport {
    pub as_of: Option<DateTime<Utc>>,
    pub scanned: usize,
    pub updated: usize,
    pub completed: usize,
    pub unchanged: usize,
    /// Investments whose refresh failed; safe to retry on the next run.
    pub failed: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefreshOutcome {
    Unchanged,
    Updated,
    Completed,
}

#[async_trait]
pub trait AccrualServiceTrait: Send + Sync {
    /// Refreshes every active investment as of the clock's current instant.
    async fn run_accrual(&self) -> Result<AccrualRunReport>;

    /// Refreshes every active investment as of `now`.
    async fn run_accrual_at(&self, now: DateTime<Utc>) -> Result<AccrualRunReport>;
}

pub struct AccrualService {
    repository: Arc<dyn InvestmentRepositoryTrait>,
    ledger_repository: Arc<dyn LedgerRepositoryTrait>,
    writer: Arc<dyn LedgerWriterTrait>,
    clock: Arc<dyn Clock>,
}

impl AccrualService {
    pub fn new(
        repository: Arc<dyn InvestmentRepositoryTrait>,
        ledger_repository: Arc<dyn LedgerRepositoryTrait>,
        writer: Arc<dyn LedgerWriterTrait>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            ledger_repository,
            writer,
            clock,
        }
    }

    async fn refresh_investment(
        &self,
        investment_id: &str,
        now: DateTime<Utc>,
    ) -> Result<RefreshOutcome> {
        let mut investment = self.repository.get_investment(investment_id)?;
        if !investment.is_active() {
            return Ok(RefreshOutcome::Unchanged);
        }

        let value = calculate_current_value(&investment, now);
        let matured = is_matured(&investment, now);
        if !matured && value == investment.current_value {
            return Ok(RefreshOutcome::Unchanged);
        }

        investment.current_value = value;
        let mut mutation = LedgerMutation::new();

        if matured {
            investment.status = InvestmentStatus::Completed;

            // Profit accrued but never claimed is paid out on completion.
            let unclaimed = value - investment.principal - investment.claimed_profit;
            if unclaimed > Decimal::ZERO {
                let mut account = self.ledger_repository.get_account(&investment.account_id)?;
                account.credit_balance(unclaimed);
                account.updated_at = now;
                investment.claimed_profit += unclaimed;
                investment.last_profit_claim_date = now;
                mutation = mutation.update_account(account).append(Transaction::completed(
                    &investment.account_id,
                    TransactionType::Return,
                    unclaimed,
                    Some(investment.id.clone()),
                    now,
                ));
            }
        }

        let outcome = if matured {
            RefreshOutcome::Completed
        } else {
            RefreshOutcome::Updated
        };
        debug!(
            "Investment {} refreshed to {} ({:?})",
            investment.id, value, outcome
        );
        self.writer
            .commit(mutation.update_investment(investment))
            .await?;
        Ok(outcome)
    }
}

#[async_trait]
impl AccrualServiceTrait for AccrualService {
    async fn run_accrual(&self) -> Result<AccrualRunReport> {
        self.run_accrual_at(self.clock.now()).await
    }

    async fn run_accrual_at(&self, now: DateTime<Utc>) -> Result<AccrualRunReport> {
        let active = self.repository.list_active_investments(None)?;
        let mut report = AccrualRunReport {
            as_of: Some(now),
            scanned: active.len(),
            ..AccrualRunReport::default()
        };

        for investment in &active {
            let outcome = retry_on_conflict("accrual refresh", || {
                self.refresh_investment(&investment.id, now)
            })
            .await;
            match outcome {
                Ok(RefreshOutcome::Unchanged) => report.unchanged += 1,
                Ok(RefreshOutcome::Updated) => report.updated += 1,
                Ok(RefreshOutcome::Completed) => report.completed += 1,
                Err(e) => {
                    warn!("Accrual refresh failed for investment {}: {}", investment.id, e);
                    report.failed.push(investment.id.clone());
                }
            }
        }

        info!(
            "Accrual run at {}: scanned {}, updated {}, completed {}, unchanged {}, failed {}",
            now,
            report.scanned,
            report.updated,
            report.completed,
            report.unchanged,
            report.failed.len()
        );
        Ok(report)
    }
}
