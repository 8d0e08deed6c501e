//! Pricing services for the warframe.market standing calculator
//!
//! This crate turns vendor catalogs into priced tables: it loads vendors,
//! fans out rate-limited statistic requests per item, and aggregates each
//! item's recent trading history into a market summary.

pub mod aggregator;
pub mod batch;
pub mod config;
pub mod rate_limiter;
pub mod scraper;
pub mod vendor_store;

pub use aggregator::aggregate;
pub use batch::{BatchConfig, BatchRun, BatchScheduler, CancelHandle, DEFAULT_RATE_LIMIT};
pub use config::{ConfigError, ScraperConfig};
pub use rate_limiter::{RateLimiter, RateLimiterStats};
pub use scraper::{Scraper, ScraperError};
pub use vendor_store::{BundledVendorStore, DirectoryVendorStore, VendorStore, VendorStoreError};
