use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::accounts_model::{LedgerAccount, NewLedgerAccount};
use super::accounts_traits::{AccountServiceTrait, LedgerRepositoryTrait};
use super::withdrawal_password::{hash_withdrawal_password, verify_withdrawal_password};
use crate::constants::MONEY_DECIMAL_PRECISION;
use crate::errors::{Error, Result, StateTransitionError, ValidationError};
use crate::ledger::{retry_on_conflict, LedgerMutation, LedgerWriterTrait, TransactionStatusUpdate};
use crate::settings::EngineSettings;
use crate::transactions::{
    DepositDecision, NewDeposit, Transaction, TransactionStatus, TransactionType,
};
use crate::utils::Clock;

/// Service for ledger accounts and deposits.
pub struct AccountService {
    repository: Arc<dyn LedgerRepositoryTrait>,
    writer: Arc<dyn LedgerWriterTrait>,
    clock: Arc<dyn Clock>,
    settings: EngineSettings,
}

impl AccountService {
    pub fn new(
        repository: Arc<dyn LedgerRepositoryTrait>,
        writer: Arc<dyn LedgerWriterTrait>,
        clock: Arc<dyn Clock>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            repository,
            writer,
            clock,
            settings,
        }
    }

    async fn try_set_withdrawal_password(
        &self,
        account_id: &str,
        current_password: Option<&str>,
        new_hash: &str,
    ) -> Result<()> {
        let mut account = self.repository.get_account(account_id)?;
        if let Some(existing) = account.withdrawal_password() {
            verify_withdrawal_password(existing, current_password)?;
        }
        account.withdrawal_password_hash = Some(new_hash.to_string());
        account.updated_at = self.clock.now();
        self.writer
            .commit(LedgerMutation::new().update_account(account))
            .await
    }

    async fn try_resolve_deposit(
        &self,
        transaction_id: &str,
        decision: &DepositDecision,
    ) -> Result<Transaction> {
        let mut deposit = self.repository.get_transaction(transaction_id)?;
        if deposit.transaction_type != TransactionType::Deposit {
            return Err(ValidationError::InvalidInput(format!(
                "Transaction {} is a {}, not a deposit",
                transaction_id,
                deposit.transaction_type.as_str()
            ))
            .into());
        }
        if deposit.status.is_terminal() {
            return Err(StateTransitionError::AlreadyResolved {
                request_id: deposit.id,
                status: deposit.status.as_str().to_string(),
            }
            .into());
        }

        let now = self.clock.now();
        let mut mutation = LedgerMutation::new();

        match decision {
            DepositDecision::Approve => {
                let mut account = self.repository.get_account(&deposit.account_id)?;
                account.credit_balance(deposit.amount);
                account.updated_at = now;

                if let Some(referrer_id) = account.referred_by.clone() {
                    if let Some((referrer, bonus_tx)) =
                        self.plan_referral_bonus(&referrer_id, &deposit, now)?
                    {
                        mutation = mutation.update_account(referrer).append(bonus_tx);
                    }
                }

                deposit.status = TransactionStatus::Completed;
                mutation = mutation.update_account(account);
            }
            DepositDecision::Reject { reason } => {
                deposit.status = TransactionStatus::Rejected;
                deposit.note = Some(reason.clone());
            }
        }
        deposit.resolved_at = Some(now);

        mutation = mutation.resolve_transaction(TransactionStatusUpdate {
            transaction_id: deposit.id.clone(),
            status: deposit.status,
            note: deposit.note.clone(),
            resolved_at: now,
        });
        mutation.check_invariants()?;
        self.writer.commit(mutation).await?;
        Ok(deposit)
    }

    /// Referrer credit for an approved deposit, if any is due.
    fn plan_referral_bonus(
        &self,
        referrer_id: &str,
        deposit: &Transaction,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<Option<(LedgerAccount, Transaction)>> {
        let pct = self.settings.referral_bonus_percent;
        if pct <= Decimal::ZERO {
            return Ok(None);
        }
        let bonus = (deposit.amount * pct / Decimal::ONE_HUNDRED).round_dp(MONEY_DECIMAL_PRECISION);
        if bonus <= Decimal::ZERO {
            return Ok(None);
        }
        let mut referrer = self.repository.get_account(referrer_id)?;
        referrer.referral_bonus += bonus;
        referrer.updated_at = now;
        let bonus_tx = Transaction::completed(
            &referrer.id,
            TransactionType::Referral,
            bonus,
            Some(deposit.id.clone()),
            now,
        );
        debug!(
            "Referral bonus {} for {} from deposit {}",
            bonus, referrer.id, deposit.id
        );
        Ok(Some((referrer, bonus_tx)))
    }
}

#[async_trait]
impl AccountServiceTrait for AccountService {
    async fn create_account(&self, new_account: NewLedgerAccount) -> Result<LedgerAccount> {
        new_account.validate()?;

        if let Some(referrer) = new_account.referred_by.as_deref() {
            self.repository.get_account(referrer).map_err(|e| match e {
                Error::NotFound(_) => Error::Validation(ValidationError::InvalidInput(format!(
                    "Referrer {} does not exist",
                    referrer
                ))),
                other => other,
            })?;
        }

        let id = new_account
            .id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let account = LedgerAccount::new(id, new_account.referred_by, self.clock.now());
        self.writer
            .commit(LedgerMutation::new().insert_account(account.clone()))
            .await?;
        info!("Opened ledger account {}", account.id);
        Ok(account)
    }

    fn get_account(&self, account_id: &str) -> Result<LedgerAccount> {
        self.repository.get_account(account_id)
    }

    async fn set_withdrawal_password(
        &self,
        account_id: &str,
        current_password: Option<String>,
        new_password: String,
    ) -> Result<()> {
        let new_hash = hash_withdrawal_password(&new_password)?;
        retry_on_conflict("set_withdrawal_password", || {
            self.try_set_withdrawal_password(account_id, current_password.as_deref(), &new_hash)
        })
        .await?;
        info!("Withdrawal password updated for account {}", account_id);
        Ok(())
    }

    async fn submit_deposit(&self, account_id: &str, deposit: NewDeposit) -> Result<Transaction> {
        deposit.validate()?;
        let account = self.repository.get_account(account_id)?;
        let transaction = Transaction::pending_deposit(
            &account.id,
            deposit.amount,
            deposit.proof_reference,
            self.clock.now(),
        );
        self.writer
            .commit(LedgerMutation::new().append(transaction.clone()))
            .await?;
        info!(
            "Deposit {} of {} submitted for account {}",
            transaction.id, transaction.amount, account_id
        );
        Ok(transaction)
    }

    async fn resolve_deposit(
        &self,
        transaction_id: &str,
        decision: DepositDecision,
    ) -> Result<Transaction> {
        if let DepositDecision::Reject { reason } = &decision {
            if reason.trim().is_empty() {
                return Err(ValidationError::MissingField("reason".to_string()).into());
            }
        }
        let resolved = retry_on_conflict("resolve_deposit", || {
            self.try_resolve_deposit(transaction_id, &decision)
        })
        .await?;
        info!(
            "Deposit {} resolved as {}",
            resolved.id,
            resolved.status.as_str()
        );
        Ok(resolved)
    }

    fn list_pending_deposits(&self) -> Result<Vec<Transaction>> {
        self.repository.list_pending_deposits()
    }

    fn list_transactions(&self, account_id: &str) -> Result<Vec<Transaction>> {
        self.repository.get_account(account_id)?;
        self.repository.list_transactions(account_id)
    }
}
