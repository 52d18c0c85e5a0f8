use std::sync::Arc;

use tenorvest_core::{
    accounts::{AccountService, AccountServiceTrait},
    investments::{AccrualService, AccrualServiceTrait, InvestmentService, InvestmentServiceTrait},
    ledger::LedgerWriterTrait,
    utils::{Clock, SystemClock},
    withdrawals::{WithdrawalService, WithdrawalServiceTrait},
};
use tenorvest_storage_sqlite::{
    open, InvestmentRepository, LedgerRepository, LedgerWriter, WithdrawalRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

pub struct AppState {
    pub account_service: Arc<dyn AccountServiceTrait>,
    pub investment_service: Arc<dyn InvestmentServiceTrait>,
    pub withdrawal_service: Arc<dyn WithdrawalServiceTrait>,
    pub accrual_service: Arc<dyn AccrualServiceTrait>,
}

pub fn init_tracing() {
    let log_format = std::env::var("TV_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    // `init` also installs the `log` bridge, so core and storage records show up here.
    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    build_state_with_clock(config, Arc::new(SystemClock)).await
}

/// Wires repositories and services over the database at `config.db_path`.
pub async fn build_state_with_clock(
    config: &Config,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<Arc<AppState>> {
    let (pool, write_handle) = open(&config.db_path)?;
    tracing::info!("Database path in use: {}", config.db_path);

    let ledger_repository = Arc::new(LedgerRepository::new(pool.clone()));
    let investment_repository = Arc::new(InvestmentRepository::new(
        pool.clone(),
        write_handle.clone(),
    ));
    let withdrawal_repository = Arc::new(WithdrawalRepository::new(pool));
    let writer: Arc<dyn LedgerWriterTrait> = Arc::new(LedgerWriter::new(write_handle));
    let settings = config.engine.clone();

    let account_service = Arc::new(AccountService::new(
        ledger_repository.clone(),
        writer.clone(),
        clock.clone(),
        settings.clone(),
    ));
    let investment_service = Arc::new(InvestmentService::new(
        investment_repository.clone(),
        ledger_repository.clone(),
        writer.clone(),
        clock.clone(),
        settings.clone(),
    ));
    let withdrawal_service = Arc::new(WithdrawalService::new(
        withdrawal_repository,
        ledger_repository.clone(),
        writer.clone(),
        clock.clone(),
        settings,
    ));
    let accrual_service = Arc::new(AccrualService::new(
        investment_repository,
        ledger_repository,
        writer,
        clock,
    ));

    Ok(Arc::new(AppState {
        account_service,
        investment_service,
        withdrawal_service,
        accrual_service,
    }))
}
