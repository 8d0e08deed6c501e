//! Core types for the warframe.market standing calculator
//!
//! This crate defines the shared data structures used across the workspace:
//! vendors and their items, daily trading statistics, the market summary
//! derived from them, and the per-item error taxonomy.

pub mod error;
pub mod fetcher;
pub mod item;
pub mod outcome;
pub mod statistics;
pub mod vendor;

pub use error::{AggregateError, FetchError, FetchResult, ItemError};
pub use fetcher::StatFetcher;
pub use item::{Item, ItemKind, MarketSummary};
pub use outcome::FetchOutcome;
pub use statistics::StatisticPoint;
pub use vendor::Vendor;
