//! Per-item result of a batch run

use crate::error::ItemError;
use crate::item::MarketSummary;

/// Result of pricing one item, published once per item per batch
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub item_name: String,
    pub result: Result<MarketSummary, ItemError>,
}

impl FetchOutcome {
    pub fn success(item_name: impl Into<String>, summary: MarketSummary) -> Self {
        Self {
            item_name: item_name.into(),
            result: Ok(summary),
        }
    }

    pub fn failure(item_name: impl Into<String>, error: impl Into<ItemError>) -> Self {
        Self {
            item_name: item_name.into(),
            result: Err(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn error(&self) -> Option<&ItemError> {
        self.result.as_ref().err()
    }
}
