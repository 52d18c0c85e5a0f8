use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tenorvest_core::settings::EngineSettings;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub accrual_interval: Duration,
    pub accrual_initial_delay: Duration,
    pub engine: EngineSettings,
}

impl Config {
    /// Reads `TV_*` variables (after loading `.env`). Unset variables take
    /// their defaults; set but unparsable ones are an error.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = env_or("TV_LISTEN_ADDR", "0.0.0.0:8080".parse()?)?;
        let db_path = std::env::var("TV_DB_PATH").unwrap_or_else(|_| "./db/app.db".into());
        let cors_allow = std::env::var("TV_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = env_or("TV_REQUEST_TIMEOUT_MS", 30_000)?;
        let accrual_secs: u64 = env_or("TV_ACCRUAL_INTERVAL_SECS", 86_400)?;
        let initial_delay_secs: u64 = env_or("TV_ACCRUAL_INITIAL_DELAY_SECS", 60)?;

        let defaults = EngineSettings::default();
        let engine = EngineSettings {
            minimum_withdrawal: env_or("TV_MIN_WITHDRAWAL", defaults.minimum_withdrawal)?,
            withdrawal_fee_percent: env_or(
                "TV_WITHDRAWAL_FEE_PERCENT",
                defaults.withdrawal_fee_percent,
            )?,
            referral_bonus_percent: env_or(
                "TV_REFERRAL_BONUS_PERCENT",
                defaults.referral_bonus_percent,
            )?,
            final_value_multiplier: env_or::<Decimal>(
                "TV_FINAL_VALUE_MULTIPLIER",
                defaults.final_value_multiplier,
            )?,
        };
        engine.validate().context("invalid engine settings")?;

        if accrual_secs == 0 {
            anyhow::bail!("TV_ACCRUAL_INTERVAL_SECS must be greater than zero");
        }

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            accrual_interval: Duration::from_secs(accrual_secs),
            accrual_initial_delay: Duration::from_secs(initial_delay_secs),
            engine,
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: '{}'", key, raw)),
        _ => Ok(default),
    }
}
