use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use log::{debug, info};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::accrual_calculator::{calculate_claimable_profit, calculate_current_value, value_investment};
use super::investments_model::{
    validate_growth_rate, ClaimReceipt, Investment, InvestmentProduct, InvestmentStatus,
    InvestmentSummary, InvestmentValuation, NewInvestmentProduct,
};
use super::investments_traits::{InvestmentRepositoryTrait, InvestmentServiceTrait};
use crate::accounts::LedgerRepositoryTrait;
use crate::errors::{Error, Result, StateTransitionError, ValidationError};
use crate::ledger::{retry_on_conflict, LedgerMutation, LedgerWriterTrait};
use crate::settings::EngineSettings;
use crate::transactions::{Transaction, TransactionType};
use crate::utils::Clock;

pub struct InvestmentService {
    repository: Arc<dyn InvestmentRepositoryTrait>,
    ledger_repository: Arc<dyn LedgerRepositoryTrait>,
    writer: Arc<dyn LedgerWriterTrait>,
    clock: Arc<dyn Clock>,
    settings: EngineSettings,
}

impl InvestmentService {
    pub fn new(
        repository: Arc<dyn InvestmentRepositoryTrait>,
        ledger_repository: Arc<dyn LedgerRepositoryTrait>,
        writer: Arc<dyn LedgerWriterTrait>,
        clock: Arc<dyn Clock>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            repository,
            ledger_repository,
            writer,
            clock,
            settings,
        }
    }

    fn owned_investment(&self, account_id: &str, investment_id: &str) -> Result<Investment> {
        let investment = self.repository.get_investment(investment_id)?;
        if investment.account_id != account_id {
            return Err(Error::NotFound(format!(
                "investment {} for account {}",
                investment_id, account_id
            )));
        }
        Ok(investment)
    }

    async fn try_open_investment(&self, account_id: &str, product_id: &str) -> Result<Investment> {
        let product = self.repository.get_product(product_id)?;
        if !product.is_active {
            return Err(ValidationError::InvalidInput(format!(
                "Product {} is not open for investment",
                product.name
            ))
            .into());
        }
        validate_growth_rate(product.daily_growth_rate)?;

        let now = self.clock.now();
        let principal = product.ticket_size;
        let end_date = Duration::try_days(product.duration_days)
            .and_then(|term| now.checked_add_signed(term))
            .ok_or_else(|| {
                ValidationError::InvalidInput(format!(
                    "Product {} has an unsupported term of {} days",
                    product.name, product.duration_days
                ))
            })?;

        let mut account = self.ledger_repository.get_account(account_id)?;
        account.debit_balance(principal)?;
        account.total_invested += principal;
        account.updated_at = now;

        let mut investment = Investment {
            id: Uuid::new_v4().to_string(),
            account_id: account.id.clone(),
            product_id: product.id.clone(),
            principal,
            start_date: now,
            end_date,
            daily_growth_rate: product.daily_growth_rate,
            final_value_cap: principal * self.settings.final_value_multiplier,
            current_value: principal,
            claimed_profit: Decimal::ZERO,
            status: InvestmentStatus::Active,
            last_profit_claim_date: now,
            version: 0,
        };
        investment.current_value = calculate_current_value(&investment, now);

        let entry = Transaction::completed(
            &account.id,
            TransactionType::Investment,
            -principal,
            Some(investment.id.clone()),
            now,
        );

        let mutation = LedgerMutation::new()
            .update_account(account)
            .insert_investment(investment.clone())
            .append(entry);
        mutation.check_invariants()?;
        self.writer.commit(mutation).await?;
        Ok(investment)
    }

    async fn try_claim(&self, account_id: &str, investment_id: &str) -> Result<ClaimReceipt> {
        let mut investment = self.owned_investment(account_id, investment_id)?;
        if !investment.is_active() {
            return Err(StateTransitionError::AlreadySettled {
                investment_id: investment.id,
                status: investment.status.to_string(),
            }
            .into());
        }

        let now = self.clock.now();
        let claimable = calculate_claimable_profit(&investment, now);
        debug!(
            "Claimable profit for investment {} at {}: {}",
            investment.id, now, claimable
        );
        if claimable <= Decimal::ZERO {
            return Err(Error::NothingToClaim {
                investment_id: investment.id,
            });
        }

        let mut account = self.ledger_repository.get_account(account_id)?;
        account.credit_balance(claimable);
        account.updated_at = now;

        investment.claimed_profit += claimable;
        investment.current_value = calculate_current_value(&investment, now);
        investment.last_profit_claim_date = now;

        let entry = Transaction::completed(
            &account.id,
            TransactionType::Return,
            claimable,
            Some(investment.id.clone()),
            now,
        );
        let receipt = ClaimReceipt {
            investment_id: investment.id.clone(),
            claimed_amount: claimable,
            transaction_id: entry.id.clone(),
            claimed_at: now,
            new_balance: account.balance,
        };

        self.writer
            .commit(
                LedgerMutation::new()
                    .update_account(account)
                    .update_investment(investment)
                    .append(entry),
            )
            .await?;
        Ok(receipt)
    }
}

#[async_trait]
impl InvestmentServiceTrait for InvestmentService {
    async fn create_product(&self, new_product: NewInvestmentProduct) -> Result<InvestmentProduct> {
        new_product.validate()?;
        let product = InvestmentProduct {
            id: new_product
                .id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: new_product.name.trim().to_string(),
            ticket_size: new_product.ticket_size,
            daily_growth_rate: new_product.daily_growth_rate,
            duration_days: new_product.duration_days,
            is_active: new_product.is_active,
            created_at: self.clock.now(),
        };
        let created = self.repository.insert_product(product).await?;
        info!("Created product {} ({})", created.name, created.id);
        Ok(created)
    }

    fn list_products(&self, active_only: bool) -> Result<Vec<InvestmentProduct>> {
        self.repository.list_products(active_only)
    }

    async fn open_investment(&self, account_id: &str, product_id: &str) -> Result<Investment> {
        let investment = retry_on_conflict("open_investment", || {
            self.try_open_investment(account_id, product_id)
        })
        .await?;
        info!(
            "Account {} opened investment {} with principal {}",
            account_id, investment.id, investment.principal
        );
        Ok(investment)
    }

    fn get_investment(&self, account_id: &str, investment_id: &str) -> Result<Investment> {
        self.owned_investment(account_id, investment_id)
    }

    fn list_investments(&self, account_id: &str) -> Result<Vec<Investment>> {
        self.repository.list_investments(account_id)
    }

    fn get_active_investments(&self, account_id: &str) -> Result<Vec<Investment>> {
        self.repository.list_active_investments(Some(account_id))
    }

    fn compute_current_value(
        &self,
        account_id: &str,
        investment_id: &str,
    ) -> Result<InvestmentValuation> {
        let investment = self.owned_investment(account_id, investment_id)?;
        Ok(value_investment(&investment, self.clock.now()))
    }

    async fn claim_profit(&self, account_id: &str, investment_id: &str) -> Result<ClaimReceipt> {
        let receipt = retry_on_conflict("claim_profit", || {
            self.try_claim(account_id, investment_id)
        })
        .await?;
        info!(
            "Claimed {} from investment {} for account {}",
            receipt.claimed_amount, investment_id, account_id
        );
        Ok(receipt)
    }

    fn investment_summary(&self, account_id: &str) -> Result<InvestmentSummary> {
        self.ledger_repository.get_account(account_id)?;
        let now = self.clock.now();
        let active = self.repository.list_active_investments(Some(account_id))?;

        let mut summary = InvestmentSummary {
            account_id: account_id.to_string(),
            ..InvestmentSummary::default()
        };
        for investment in &active {
            let valuation = value_investment(investment, now);
            summary.active_count += 1;
            summary.active_principal += investment.principal;
            summary.current_value += valuation.current_value;
            summary.claimable_profit += valuation.claimable_profit;
        }
        Ok(summary)
    }
}
