//! Source of per-item trading history

use async_trait::async_trait;

use crate::error::FetchResult;
use crate::statistics::StatisticPoint;

/// Retrieves the recent closed-trade statistics for an item
///
/// Implementations return points most-recent-first. Every error is terminal
/// for the item; callers do not retry.
#[async_trait]
pub trait StatFetcher: Send + Sync {
    async fn fetch(&self, item_name: &str) -> FetchResult<Vec<StatisticPoint>>;
}
