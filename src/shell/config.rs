// Process configuration, read from the environment once at startup.
//
// Every key is optional. A `.env` file in the working directory is honoured.
// Malformed values stop the process instead of silently falling back.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::modules::meetings::application::context::RetryPolicy;
use crate::modules::meetings::application::deps::EngineSettings;
use crate::shared::core::primitives::{Money, is_valid_amount};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub log_directive: String,
    pub engine: EngineSettings,
    pub permission_cache_ttl: Duration,
    pub bus_capacity: usize,
    pub default_wage: Money,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = Reader { lookup: &lookup };
        let defaults = EngineSettings::default();

        let engine = EngineSettings {
            ledger_timeout: Duration::from_millis(
                read.parsed("MEETING_COSTS_LEDGER_TIMEOUT_MS", 10_000u64)?,
            ),
            retry: RetryPolicy {
                max_attempts: read
                    .parsed("MEETING_COSTS_LEDGER_MAX_ATTEMPTS", defaults.retry.max_attempts)?,
                base_delay: Duration::from_millis(
                    read.parsed("MEETING_COSTS_RETRY_BASE_DELAY_MS", 50u64)?,
                ),
            },
            meeting_cache_ttl: Duration::from_secs(
                read.parsed("MEETING_COSTS_MEETING_CACHE_TTL_SECS", 900u64)?,
            ),
            increments_cache_ttl: Duration::from_secs(
                read.parsed("MEETING_COSTS_INCREMENTS_CACHE_TTL_SECS", 900u64)?,
            ),
        };
        if engine.retry.max_attempts == 0 {
            return Err(read.invalid("MEETING_COSTS_LEDGER_MAX_ATTEMPTS"));
        }

        let default_wage: Money = read.parsed("MEETING_COSTS_DEFAULT_WAGE", 0.0)?;
        if !is_valid_amount(default_wage) {
            return Err(read.invalid("MEETING_COSTS_DEFAULT_WAGE"));
        }

        Ok(Self {
            bind_addr: read.parsed(
                "MEETING_COSTS_BIND_ADDR",
                SocketAddr::from(([0, 0, 0, 0], 8080)),
            )?,
            log_directive: (read.lookup)("MEETING_COSTS_LOG").unwrap_or_else(|| "info".to_string()),
            engine,
            permission_cache_ttl: Duration::from_secs(
                read.parsed("MEETING_COSTS_PERMISSION_CACHE_TTL_SECS", 60u64)?,
            ),
            bus_capacity: read.parsed("MEETING_COSTS_BUS_CAPACITY", 256usize)?,
            default_wage,
        })
    }
}

struct Reader<'a> {
    lookup: &'a dyn Fn(&str) -> Option<String>,
}

impl Reader<'_> {
    fn parsed<T: FromStr>(&self, key: &'static str, default: T) -> Result<T, ConfigError> {
        match (self.lookup)(key) {
            None => Ok(default),
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid { key, value: raw }),
        }
    }

    fn invalid(&self, key: &'static str) -> ConfigError {
        ConfigError::Invalid {
            key,
            value: (self.lookup)(key).unwrap_or_default(),
        }
    }
}
