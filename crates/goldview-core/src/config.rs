//! Environment-driven configuration shared by the server and the CLI.

use std::env;

use thiserror::Error;

use crate::domestic::scrape::DEFAULT_SCRAPE_URL;
use crate::domestic::sidebar::{DEFAULT_SIDEBAR_KEY, DEFAULT_SIDEBAR_URL};
use crate::domestic::table::DEFAULT_TABLE_URL;
use crate::domestic::DomesticSourceKind;
use crate::market_chart::DEFAULT_CHART_BASE_URL;
use crate::{Symbol, ValidationError};

pub const DEFAULT_METAL_SYMBOL: &str = "GC=F";
pub const DEFAULT_FX_SYMBOL: &str = "KRW=X";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: {source}")]
    Invalid {
        var: &'static str,
        #[source]
        source: ValidationError,
    },
    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidTimeout { var: &'static str, value: String },
    #[error("{var} cannot be empty")]
    Empty { var: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoldviewConfig {
    pub domestic_source: DomesticSourceKind,
    pub scrape_url: String,
    pub sidebar_url: String,
    pub sidebar_key: String,
    pub table_url: String,
    pub chart_base_url: String,
    pub metal_symbol: Symbol,
    pub fx_symbol: Symbol,
    pub timeout_ms: u64,
    pub bind_addr: String,
    pub log_level: String,
}

impl Default for GoldviewConfig {
    fn default() -> Self {
        Self {
            domestic_source: DomesticSourceKind::default(),
            scrape_url: DEFAULT_SCRAPE_URL.to_owned(),
            sidebar_url: DEFAULT_SIDEBAR_URL.to_owned(),
            sidebar_key: DEFAULT_SIDEBAR_KEY.to_owned(),
            table_url: DEFAULT_TABLE_URL.to_owned(),
            chart_base_url: DEFAULT_CHART_BASE_URL.to_owned(),
            metal_symbol: Symbol::from_static(DEFAULT_METAL_SYMBOL),
            fx_symbol: Symbol::from_static(DEFAULT_FX_SYMBOL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            bind_addr: DEFAULT_BIND_ADDR.to_owned(),
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
        }
    }
}

impl GoldviewConfig {
    /// Reads `GOLDVIEW_*` variables, falling back to defaults for unset ones.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |var: &'static str| -> Result<Option<String>, ConfigError> {
            match lookup(var) {
                None => Ok(None),
                Some(value) if value.trim().is_empty() => Err(ConfigError::Empty { var }),
                Some(value) => Ok(Some(value.trim().to_owned())),
            }
        };

        let mut config = Self::default();

        if let Some(value) = read("GOLDVIEW_DOMESTIC_SOURCE")? {
            config.domestic_source = value.parse().map_err(|source| ConfigError::Invalid {
                var: "GOLDVIEW_DOMESTIC_SOURCE",
                source,
            })?;
        }
        if let Some(value) = read("GOLDVIEW_SCRAPE_URL")? {
            config.scrape_url = value;
        }
        if let Some(value) = read("GOLDVIEW_SIDEBAR_URL")? {
            config.sidebar_url = value;
        }
        if let Some(value) = read("GOLDVIEW_SIDEBAR_KEY")? {
            config.sidebar_key = value;
        }
        if let Some(value) = read("GOLDVIEW_TABLE_URL")? {
            config.table_url = value;
        }
        if let Some(value) = read("GOLDVIEW_CHART_BASE_URL")? {
            config.chart_base_url = value;
        }
        if let Some(value) = read("GOLDVIEW_METAL_SYMBOL")? {
            config.metal_symbol = Symbol::parse(&value).map_err(|source| ConfigError::Invalid {
                var: "GOLDVIEW_METAL_SYMBOL",
                source,
            })?;
        }
        if let Some(value) = read("GOLDVIEW_FX_SYMBOL")? {
            config.fx_symbol = Symbol::parse(&value).map_err(|source| ConfigError::Invalid {
                var: "GOLDVIEW_FX_SYMBOL",
                source,
            })?;
        }
        if let Some(value) = read("GOLDVIEW_TIMEOUT_MS")? {
            config.timeout_ms = value
                .parse::<u64>()
                .ok()
                .filter(|timeout_ms| *timeout_ms > 0)
                .ok_or(ConfigError::InvalidTimeout {
                    var: "GOLDVIEW_TIMEOUT_MS",
                    value,
                })?;
        }
        if let Some(value) = read("GOLDVIEW_BIND_ADDR")? {
            config.bind_addr = value;
        }
        if let Some(value) = read("GOLDVIEW_LOG_LEVEL")? {
            config.log_level = value;
        }

        Ok(config)
    }

    pub fn with_domestic_source(mut self, domestic_source: DomesticSourceKind) -> Self {
        self.domestic_source = domestic_source;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_chart_base_url(mut self, chart_base_url: impl Into<String>) -> Self {
        self.chart_base_url = chart_base_url.into();
        self
    }
}
