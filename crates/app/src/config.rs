//! Runtime configuration read from `FARMA_*` environment variables.

use std::time::Duration;

use thiserror::Error;

use farmacontrol_inventory::StockPolicy;
use farmacontrol_observability::LogFormat;

pub const ASSISTANT_DELAY_MS: &str = "FARMA_ASSISTANT_DELAY_MS";
pub const SALE_NOTICE_MS: &str = "FARMA_SALE_NOTICE_MS";
pub const STOCK_POLICY: &str = "FARMA_STOCK_POLICY";
pub const EXPIRY_WARNING_DAYS: &str = "FARMA_EXPIRY_WARNING_DAYS";
pub const LOG_FORMAT: &str = "FARMA_LOG_FORMAT";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value `{value}` for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// How long the assistant "types" before its reply lands.
    pub assistant_delay: Duration,
    /// How long the sale-completed notice stays up.
    pub sale_notice: Duration,
    /// What checkout does with lines that exceed stock.
    pub stock_policy: StockPolicy,
    /// Products expiring within this many days raise an alert.
    pub expiry_warning_days: i64,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assistant_delay: Duration::from_millis(1500),
            sale_notice: Duration::from_millis(3000),
            stock_policy: StockPolicy::AllowNegative,
            expiry_warning_days: 90,
            log_format: LogFormat::Json,
        }
    }
}

impl AppConfig {
    /// Read the process environment. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = lookup(ASSISTANT_DELAY_MS) {
            cfg.assistant_delay = Duration::from_millis(parse_number(ASSISTANT_DELAY_MS, &v)?);
        }
        if let Some(v) = lookup(SALE_NOTICE_MS) {
            cfg.sale_notice = Duration::from_millis(parse_number(SALE_NOTICE_MS, &v)?);
        }
        if let Some(v) = lookup(STOCK_POLICY) {
            cfg.stock_policy = v.parse().map_err(|_| invalid(STOCK_POLICY, &v))?;
        }
        if let Some(v) = lookup(EXPIRY_WARNING_DAYS) {
            let days: u64 = parse_number(EXPIRY_WARNING_DAYS, &v)?;
            cfg.expiry_warning_days = i64::try_from(days).map_err(|_| invalid(EXPIRY_WARNING_DAYS, &v))?;
        }
        if let Some(v) = lookup(LOG_FORMAT) {
            cfg.log_format = v.parse().map_err(|_| invalid(LOG_FORMAT, &v))?;
        }

        Ok(cfg)
    }

    pub fn with_assistant_delay(mut self, delay: Duration) -> Self {
        self.assistant_delay = delay;
        self
    }

    pub fn with_sale_notice(mut self, duration: Duration) -> Self {
        self.sale_notice = duration;
        self
    }

    pub fn with_stock_policy(mut self, policy: StockPolicy) -> Self {
        self.stock_policy = policy;
        self
    }

    pub fn with_expiry_warning_days(mut self, days: i64) -> Self {
        self.expiry_warning_days = days;
        self
    }
}

fn parse_number(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

fn invalid(key: &'static str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
    }
}
