use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::eligibility_calculator::calculate_eligibility;
use super::withdrawals_model::{
    EligibilityBreakdown, NewWithdrawalRequest, WithdrawalDecision, WithdrawalRequest,
    WithdrawalSource, WithdrawalStatus,
};
use super::withdrawals_traits::{WithdrawalRepositoryTrait, WithdrawalServiceTrait};
use crate::accounts::{verify_withdrawal_password, LedgerRepositoryTrait};
use crate::constants::MONEY_DECIMAL_PRECISION;
use crate::errors::{Error, FundsSource, Result, StateTransitionError, ValidationError};
use crate::ledger::{retry_on_conflict, LedgerMutation, LedgerWriterTrait};
use crate::settings::EngineSettings;
use crate::transactions::{Transaction, TransactionType};
use crate::utils::Clock;

pub struct WithdrawalService {
    repository: Arc<dyn WithdrawalRepositoryTrait>,
    ledger_repository: Arc<dyn LedgerRepositoryTrait>,
    writer: Arc<dyn LedgerWriterTrait>,
    clock: Arc<dyn Clock>,
    settings: EngineSettings,
}

impl WithdrawalService {
    pub fn new(
        repository: Arc<dyn WithdrawalRepositoryTrait>,
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

    /// Shape checks that need no account state.
    fn validate_request(&self, request: &NewWithdrawalRequest) -> Result<()> {
        if request.amount < self.settings.minimum_withdrawal || request.amount <= Decimal::ZERO {
            return Err(ValidationError::BelowMinimum {
                field: format!("amount {}", request.amount),
                label: "withdrawal".to_string(),
                minimum: self.settings.minimum_withdrawal,
            }
            .into());
        }
        if request.destination_address.trim().is_empty() {
            return Err(ValidationError::MissingField("destinationAddress".to_string()).into());
        }
        Ok(())
    }

    async fn try_submit(
        &self,
        account_id: &str,
        request: &NewWithdrawalRequest,
    ) -> Result<WithdrawalRequest> {
        let mut account = self.ledger_repository.get_account(account_id)?;

        if let Some(hash) = account.withdrawal_password() {
            verify_withdrawal_password(hash, request.password.as_deref())?;
        }

        // Re-derived from the row just read, never from what the client saw.
        let eligibility = calculate_eligibility(&account);
        let bucket = eligibility.bucket(request.source);
        let backing = match request.source {
            WithdrawalSource::Profit => account.balance,
            WithdrawalSource::ReferralBonus => account.referral_bonus,
        };
        let available = bucket.min(backing).max(Decimal::ZERO);
        debug!(
            "Withdrawal check for {}: requested {} from {}, bucket {}, backing {}",
            account_id,
            request.amount,
            request.source.as_str(),
            bucket,
            backing
        );
        if request.amount > available {
            return Err(Error::InsufficientFunds {
                bucket: FundsSource::Bucket(request.source),
                requested: request.amount,
                available,
            });
        }

        let now = self.clock.now();
        match request.source {
            WithdrawalSource::Profit => account.balance -= request.amount,
            WithdrawalSource::ReferralBonus => account.referral_bonus -= request.amount,
        }
        account.escrowed_amount += request.amount;
        account.updated_at = now;

        let fee_amount = (request.amount * self.settings.withdrawal_fee_percent
            / Decimal::ONE_HUNDRED)
            .round_dp(MONEY_DECIMAL_PRECISION);

        let withdrawal = WithdrawalRequest {
            id: Uuid::new_v4().to_string(),
            account_id: account.id.clone(),
            amount: request.amount,
            source: request.source,
            destination_address: request.destination_address.trim().to_string(),
            fee_amount,
            status: WithdrawalStatus::Pending,
            tx_reference: None,
            rejection_reason: None,
            created_at: now,
            resolved_at: None,
            version: 0,
        };

        let mutation = LedgerMutation::new()
            .update_account(account)
            .insert_withdrawal(withdrawal.clone());
        mutation.check_invariants()?;
        self.writer.commit(mutation).await?;
        Ok(withdrawal)
    }

    async fn try_resolve(
        &self,
        request_id: &str,
        decision: &WithdrawalDecision,
    ) -> Result<WithdrawalRequest> {
        let mut request = self.repository.get_withdrawal(request_id)?;
        if request.status.is_terminal() {
            return Err(StateTransitionError::AlreadyResolved {
                request_id: request.id,
                status: request.status.as_str().to_string(),
            }
            .into());
        }

        let now = self.clock.now();
        let mut account = self.ledger_repository.get_account(&request.account_id)?;
        account.escrowed_amount -= request.amount;
        account.updated_at = now;

        let mut mutation = LedgerMutation::new();
        match decision {
            WithdrawalDecision::Approve { tx_reference } => {
                account.total_withdrawn += request.amount;
                request.status = WithdrawalStatus::Approved;
                request.tx_reference = Some(tx_reference.trim().to_string());
                mutation = mutation.append(Transaction::completed(
                    &account.id,
                    TransactionType::Withdrawal,
                    -request.amount,
                    Some(request.id.clone()),
                    now,
                ));
            }
            WithdrawalDecision::Reject { reason } => {
                // Refunds always land in the generic balance, whatever the source bucket.
                account.credit_balance(request.amount);
                request.status = WithdrawalStatus::Rejected;
                request.rejection_reason = Some(reason.trim().to_string());
            }
        }
        request.resolved_at = Some(now);

        let mutation = mutation
            .update_account(account)
            .update_withdrawal(request.clone());
        mutation.check_invariants()?;
        self.writer.commit(mutation).await?;
        Ok(request)
    }
}

#[async_trait]
impl WithdrawalServiceTrait for WithdrawalService {
    fn compute_eligibility(&self, account_id: &str) -> Result<EligibilityBreakdown> {
        let account = self.ledger_repository.get_account(account_id)?;
        Ok(calculate_eligibility(&account))
    }

    async fn submit_withdrawal(
        &self,
        account_id: &str,
        request: NewWithdrawalRequest,
    ) -> Result<WithdrawalRequest> {
        self.validate_request(&request)?;
        let withdrawal = retry_on_conflict("submit_withdrawal", || {
            self.try_submit(account_id, &request)
        })
        .await?;
        info!(
            "Withdrawal {} of {} from {} submitted for account {}",
            withdrawal.id,
            withdrawal.amount,
            withdrawal.source.as_str(),
            account_id
        );
        Ok(withdrawal)
    }

    async fn resolve_withdrawal(
        &self,
        request_id: &str,
        decision: WithdrawalDecision,
    ) -> Result<WithdrawalRequest> {
        decision.validate()?;
        let resolved = retry_on_conflict("resolve_withdrawal", || {
            self.try_resolve(request_id, &decision)
        })
        .await?;
        info!(
            "Withdrawal {} resolved as {}",
            resolved.id,
            resolved.status.as_str()
        );
        Ok(resolved)
    }

    fn list_withdrawals(&self, account_id: &str) -> Result<Vec<WithdrawalRequest>> {
        self.ledger_repository.get_account(account_id)?;
        self.repository.list_withdrawals(account_id)
    }

    fn list_pending_withdrawals(&self) -> Result<Vec<WithdrawalRequest>> {
        self.repository.list_pending_withdrawals()
    }
}
