//! warframe.market integration for the standing calculator
//!
//! This crate provides a client for the public warframe.market REST API,
//! used to retrieve the closed-trade statistics of vendor items.

pub mod client;
pub mod types;

pub use client::{MarketClient, WFM_API_BASE};
