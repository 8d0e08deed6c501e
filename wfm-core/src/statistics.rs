//! Daily trading statistics

use serde::{Deserialize, Serialize};

/// One day of closed trades for an item
///
/// Sequences of points are ordered most-recent-first.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticPoint {
    /// Number of units traded that day
    pub volume: u64,

    /// Average trade price in platinum
    pub avg_price: f64,

    /// Mod rank the trades were made at, only reported for mods
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mod_rank: Option<u32>,
}

impl StatisticPoint {
    pub fn new(volume: u64, avg_price: f64) -> Self {
        Self {
            volume,
            avg_price,
            mod_rank: None,
        }
    }

    pub fn with_mod_rank(mut self, rank: u32) -> Self {
        self.mod_rank = Some(rank);
        self
    }

    /// Whether this point describes the unranked variant of an item.
    /// Points without a rank tag count as unranked.
    pub fn is_unranked(&self) -> bool {
        self.mod_rank.unwrap_or(0) == 0
    }
}
