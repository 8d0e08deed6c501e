//! Scraper configuration

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use wfm_market::WFM_API_BASE;

use crate::batch::DEFAULT_RATE_LIMIT;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Settings for the market client, batch scheduler and vendor store
#[derive(Debug, Clone, PartialEq)]
pub struct ScraperConfig {
    /// warframe.market API base URL
    pub api_base: String,
    /// Minimum time between two market requests
    pub rate_limit: Duration,
    /// Timeout for a single market request
    pub http_timeout: Duration,
    /// Directory of vendor catalogs; bundled catalogs when unset
    pub vendor_dir: Option<PathBuf>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            api_base: WFM_API_BASE.to_string(),
            rate_limit: DEFAULT_RATE_LIMIT,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            vendor_dir: None,
        }
    }
}

impl ScraperConfig {
    /// Load configuration from environment variables
    ///
    /// Reads (all optional):
    /// - WFM_API_BASE: API base URL
    /// - WFM_RATE_LIMIT_MS: milliseconds between requests
    /// - WFM_HTTP_TIMEOUT_SECS: request timeout
    /// - WFM_VENDOR_DIR: directory of vendor JSON files
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(base) = lookup("WFM_API_BASE").filter(|s| !s.is_empty()) {
            config.api_base = base;
        }

        if let Some(ms) = lookup("WFM_RATE_LIMIT_MS") {
            let ms = parse_positive("WFM_RATE_LIMIT_MS", &ms)?;
            config.rate_limit = Duration::from_millis(ms);
        }

        if let Some(secs) = lookup("WFM_HTTP_TIMEOUT_SECS") {
            let secs = parse_positive("WFM_HTTP_TIMEOUT_SECS", &secs)?;
            config.http_timeout = Duration::from_secs(secs);
        }

        if let Some(dir) = lookup("WFM_VENDOR_DIR").filter(|s| !s.is_empty()) {
            config.vendor_dir = Some(PathBuf::from(dir));
        }

        Ok(config)
    }
}

fn parse_positive(field: &str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidNumber {
            field: field.to_string(),
            value: value.to_string(),
            error: "must be greater than zero".to_string(),
        }),
        Ok(n) => Ok(n),
        Err(e) => Err(ConfigError::InvalidNumber {
            field: field.to_string(),
            value: value.to_string(),
            error: e.to_string(),
        }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {field}: {error}")]
    InvalidNumber {
        field: String,
        value: String,
        error: String,
    },
}
