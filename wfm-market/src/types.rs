//! warframe.market API response types
//!
//! These types mirror the `/items/{url_name}/statistics` response and are
//! converted to wfm-core types for use in the application.

use serde::{Deserialize, Serialize};
use wfm_core::StatisticPoint;

/// Response from GET /items/{url_name}/statistics
#[derive(Debug, Clone, Deserialize)]
pub struct StatisticsResponse {
    pub payload: StatisticsPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatisticsPayload {
    pub statistics_closed: ClosedStatistics,
}

/// Closed-trade statistics grouped by window
#[derive(Debug, Clone, Deserialize)]
pub struct ClosedStatistics {
    /// Daily entries covering the last 90 days
    #[serde(rename = "90days")]
    pub ninety_days: Vec<ClosedStatistic>,
}

/// One daily entry of closed trades
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClosedStatistic {
    /// Day the entry covers (ISO 8601)
    #[serde(default)]
    pub datetime: Option<String>,

    pub volume: u64,

    pub avg_price: f64,

    /// Only present for rankable items
    #[serde(default)]
    pub mod_rank: Option<u32>,
}

impl ClosedStatistic {
    pub fn to_statistic_point(&self) -> StatisticPoint {
        StatisticPoint {
            volume: self.volume,
            avg_price: self.avg_price,
            mod_rank: self.mod_rank,
        }
    }
}

impl StatisticsResponse {
    /// Daily points in the order the API returned them
    pub fn into_points(self) -> Vec<StatisticPoint> {
        self.payload
            .statistics_closed
            .ninety_days
            .iter()
            .map(ClosedStatistic::to_statistic_point)
            .collect()
    }
}
