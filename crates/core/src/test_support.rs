//! In-memory store and service wiring shared by the service tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::accounts::{AccountService, LedgerAccount, LedgerRepositoryTrait};
use crate::errors::{DatabaseError, Error, Result};
use crate::investments::{
    AccrualService, Investment, InvestmentProduct, InvestmentRepositoryTrait, InvestmentService,
    InvestmentStatus,
};
use crate::ledger::{LedgerMutation, LedgerWriterTrait, RowWrite};
use crate::settings::EngineSettings;
use crate::transactions::{Transaction, TransactionStatus, TransactionType};
use crate::utils::FixedClock;
use crate::withdrawals::{WithdrawalRepositoryTrait, WithdrawalRequest, WithdrawalService, WithdrawalStatus};

#[derive(Clone, Default)]
struct State {
    accounts: HashMap<String, LedgerAccount>,
    products: HashMap<String, InvestmentProduct>,
    investments: HashMap<String, Investment>,
    withdrawals: HashMap<String, WithdrawalRequest>,
    transactions: Vec<Transaction>,
}

/// Versioned in-memory store with the same commit semantics as the SQLite writer.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    /// Investment ids whose commits fail with a database error.
    failing_investments: Mutex<HashSet<String>>,
    commits: Mutex<usize>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn put_account(&self, account: LedgerAccount) {
        self.state
            .lock()
            .unwrap()
            .accounts
            .insert(account.id.clone(), account);
    }

    pub fn put_product(&self, product: InvestmentProduct) {
        self.state
            .lock()
            .unwrap()
            .products
            .insert(product.id.clone(), product);
    }

    pub fn put_investment(&self, investment: Investment) {
        self.state
            .lock()
            .unwrap()
            .investments
            .insert(investment.id.clone(), investment);
    }

    pub fn account(&self, id: &str) -> LedgerAccount {
        self.state.lock().unwrap().accounts[id].clone()
    }

    pub fn investment(&self, id: &str) -> Investment {
        self.state.lock().unwrap().investments[id].clone()
    }

    pub fn transactions_of(&self, account_id: &str) -> Vec<Transaction> {
        self.state
            .lock()
            .unwrap()
            .transactions
            .iter()
            .filter(|t| t.account_id == account_id)
            .cloned()
            .collect()
    }

    pub fn fail_commits_for(&self, investment_id: &str) {
        self.failing_investments
            .lock()
            .unwrap()
            .insert(investment_id.to_string());
    }

    pub fn commit_count(&self) -> usize {
        *self.commits.lock().unwrap()
    }

    fn apply(&self, state: &mut State, mutation: LedgerMutation) -> Result<()> {
        for write in mutation.accounts {
            apply_row(&mut state.accounts, write, |a| &a.id, |a| &mut a.version, "account")?;
        }
        if let Some(write) = mutation.investment {
            if self
                .failing_investments
                .lock()
                .unwrap()
                .contains(&write.row().id)
            {
                return Err(DatabaseError::QueryFailed("injected failure".to_string()).into());
            }
            apply_row(
                &mut state.investments,
                write,
                |i| &i.id,
                |i| &mut i.version,
                "investment",
            )?;
        }
        if let Some(write) = mutation.withdrawal {
            apply_row(
                &mut state.withdrawals,
                write,
                |w| &w.id,
                |w| &mut w.version,
                "withdrawal request",
            )?;
        }
        if let Some(update) = mutation.transaction_update {
            let tx = state
                .transactions
                .iter_mut()
                .find(|t| t.id == update.transaction_id)
                .ok_or_else(|| Error::NotFound(format!("transaction {}", update.transaction_id)))?;
            if tx.status != TransactionStatus::Pending {
                return Err(Error::ConcurrencyConflict(format!(
                    "transaction {} is no longer pending",
                    tx.id
                )));
            }
            tx.status = update.status;
            tx.note = update.note;
            tx.resolved_at = Some(update.resolved_at);
        }
        state.transactions.extend(mutation.appended);
        Ok(())
    }
}

fn apply_row<T>(
    rows: &mut HashMap<String, T>,
    write: RowWrite<T>,
    id: impl Fn(&T) -> &String,
    version: impl Fn(&mut T) -> &mut i64,
    kind: &str,
) -> Result<()> {
    match write {
        RowWrite::Insert(row) => {
            let key = id(&row).clone();
            if rows.contains_key(&key) {
                return Err(DatabaseError::UniqueViolation(format!("{} {}", kind, key)).into());
            }
            rows.insert(key, row);
        }
        RowWrite::Update(mut row) => {
            let key = id(&row).clone();
            let stored = rows
                .get_mut(&key)
                .ok_or_else(|| Error::NotFound(format!("{} {}", kind, key)))?;
            let expected = *version(&mut row);
            if *version(&mut *stored) != expected {
                return Err(Error::ConcurrencyConflict(format!(
                    "{} {} changed since version {}",
                    kind, key, expected
                )));
            }
            *version(&mut row) = expected + 1;
            *stored = row;
        }
    }
    Ok(())
}

#[async_trait]
impl LedgerWriterTrait for InMemoryStore {
    async fn commit(&self, mutation: LedgerMutation) -> Result<()> {
        // Lets concurrently polled operations interleave between read and write.
        tokio::task::yield_now().await;
        let mut guard = self.state.lock().unwrap();
        let mut next = guard.clone();
        self.apply(&mut next, mutation)?;
        *guard = next;
        *self.commits.lock().unwrap() += 1;
        Ok(())
    }
}

impl LedgerRepositoryTrait for InMemoryStore {
    fn get_account(&self, account_id: &str) -> Result<LedgerAccount> {
        self.state
            .lock()
            .unwrap()
            .accounts
            .get(account_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("account {}", account_id)))
    }

    fn list_accounts(&self) -> Result<Vec<LedgerAccount>> {
        Ok(self.state.lock().unwrap().accounts.values().cloned().collect())
    }

    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        self.state
            .lock()
            .unwrap()
            .transactions
            .iter()
            .find(|t| t.id == transaction_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("transaction {}", transaction_id)))
    }

    fn list_transactions(&self, account_id: &str) -> Result<Vec<Transaction>> {
        let mut txs: Vec<Transaction> = self.transactions_of(account_id).into_iter().rev().collect();
        txs.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(txs)
    }

    fn list_pending_deposits(&self) -> Result<Vec<Transaction>> {
        let mut txs: Vec<Transaction> = self
            .state
            .lock()
            .unwrap()
            .transactions
            .iter()
            .filter(|t| {
                t.transaction_type == TransactionType::Deposit
                    && t.status == TransactionStatus::Pending
            })
            .cloned()
            .collect();
        txs.sort_by(|a, b| a.date.cmp(&b.date));
        Ok(txs)
    }
}

#[async_trait]
impl InvestmentRepositoryTrait for InMemoryStore {
    fn get_product(&self, product_id: &str) -> Result<InvestmentProduct> {
        self.state
            .lock()
            .unwrap()
            .products
            .get(product_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("product {}", product_id)))
    }

    fn list_products(&self, active_only: bool) -> Result<Vec<InvestmentProduct>> {
        let mut products: Vec<InvestmentProduct> = self
            .state
            .lock()
            .unwrap()
            .products
            .values()
            .filter(|p| !active_only || p.is_active)
            .cloned()
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn insert_product(&self, product: InvestmentProduct) -> Result<InvestmentProduct> {
        let mut state = self.state.lock().unwrap();
        if state.products.contains_key(&product.id) {
            return Err(DatabaseError::UniqueViolation(format!("product {}", product.id)).into());
        }
        state.products.insert(product.id.clone(), product.clone());
        Ok(product)
    }

    fn get_investment(&self, investment_id: &str) -> Result<Investment> {
        self.state
            .lock()
            .unwrap()
            .investments
            .get(investment_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("investment {}", investment_id)))
    }

    fn list_investments(&self, account_id: &str) -> Result<Vec<Investment>> {
        let mut investments: Vec<Investment> = self
            .state
            .lock()
            .unwrap()
            .investments
            .values()
            .filter(|i| i.account_id == account_id)
            .cloned()
            .collect();
        investments.sort_by(|a, b| b.start_date.cmp(&a.start_date).then(a.id.cmp(&b.id)));
        Ok(investments)
    }

    fn list_active_investments(&self, account_id: Option<&str>) -> Result<Vec<Investment>> {
        let mut investments: Vec<Investment> = self
            .state
            .lock()
            .unwrap()
            .investments
            .values()
            .filter(|i| i.status == InvestmentStatus::Active)
            .filter(|i| account_id.map_or(true, |id| i.account_id == id))
            .cloned()
            .collect();
        investments.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(investments)
    }
}

impl WithdrawalRepositoryTrait for InMemoryStore {
    fn get_withdrawal(&self, request_id: &str) -> Result<WithdrawalRequest> {
        self.state
            .lock()
            .unwrap()
            .withdrawals
            .get(request_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("withdrawal request {}", request_id)))
    }

    fn list_withdrawals(&self, account_id: &str) -> Result<Vec<WithdrawalRequest>> {
        let mut requests: Vec<WithdrawalRequest> = self
            .state
            .lock()
            .unwrap()
            .withdrawals
            .values()
            .filter(|w| w.account_id == account_id)
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }

    fn list_pending_withdrawals(&self) -> Result<Vec<WithdrawalRequest>> {
        let mut requests: Vec<WithdrawalRequest> = self
            .state
            .lock()
            .unwrap()
            .withdrawals
            .values()
            .filter(|w| w.status == WithdrawalStatus::Pending)
            .cloned()
            .collect();
        requests.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(requests)
    }
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 1, 8, 0, 0).unwrap()
}

/// Store, clock and settings wired into every service.
pub struct Fixture {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<FixedClock>,
    pub settings: EngineSettings,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_settings(EngineSettings::default())
    }

    pub fn with_settings(settings: EngineSettings) -> Self {
        Self {
            store: InMemoryStore::new(),
            clock: Arc::new(FixedClock::new(t0())),
            settings,
        }
    }

    pub fn accounts(&self) -> AccountService {
        AccountService::new(
            self.store.clone(),
            self.store.clone(),
            self.clock.clone(),
            self.settings.clone(),
        )
    }

    pub fn investments(&self) -> InvestmentService {
        InvestmentService::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.clock.clone(),
            self.settings.clone(),
        )
    }

    pub fn withdrawals(&self) -> WithdrawalService {
        WithdrawalService::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.clock.clone(),
            self.settings.clone(),
        )
    }

    pub fn accrual(&self) -> AccrualService {
        AccrualService::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.clock.clone(),
        )
    }

    /// Seeds an account with the given balances.
    pub fn seed_account(
        &self,
        id: &str,
        balance: Decimal,
        total_invested: Decimal,
        referral_bonus: Decimal,
    ) -> LedgerAccount {
        let mut account = LedgerAccount::new(id.to_string(), None, t0());
        account.balance = balance;
        account.total_invested = total_invested;
        account.referral_bonus = referral_bonus;
        self.store.put_account(account.clone());
        account
    }

    pub fn seed_product(
        &self,
        id: &str,
        ticket_size: Decimal,
        rate: Decimal,
        duration_days: i64,
    ) -> InvestmentProduct {
        let product = InvestmentProduct {
            id: id.to_string(),
            name: format!("Plan {}", id),
            ticket_size,
            daily_growth_rate: rate,
            duration_days,
            is_active: true,
            created_at: t0(),
        };
        self.store.put_product(product.clone());
        product
    }

    /// Seeds an active investment started at `t0()`.
    pub fn seed_investment(
        &self,
        id: &str,
        account_id: &str,
        principal: Decimal,
        rate: Decimal,
        duration_days: i64,
    ) -> Investment {
        let investment = Investment {
            id: id.to_string(),
            account_id: account_id.to_string(),
            product_id: "prod-seed".to_string(),
            principal,
            start_date: t0(),
            end_date: t0() + Duration::days(duration_days),
            daily_growth_rate: rate,
            final_value_cap: principal * self.settings.final_value_multiplier,
            current_value: principal,
            claimed_profit: Decimal::ZERO,
            status: InvestmentStatus::Active,
            last_profit_claim_date: t0(),
            version: 0,
        };
        self.store.put_investment(investment.clone());
        investment
    }
}
