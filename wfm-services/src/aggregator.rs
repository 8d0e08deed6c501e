//! Statistics Aggregator
//!
//! Turns an item's daily trading history into a two-day, volume-weighted
//! market summary.

use wfm_core::{AggregateError, ItemKind, MarketSummary, StatisticPoint};

/// Summarise the two most recent relevant days of `points`
///
/// `points` must be ordered most-recent-first. Points the item kind does not
/// price (ranked mods) are dropped before anything else. With `p0` today and
/// `p1` yesterday:
///
/// - `weighted_avg_price = (p0.price * p0.volume + p1.price * p1.volume) / (p0.volume + p1.volume)`
/// - `avg_volume = (p0.volume + p1.volume) / 2`
pub fn aggregate(points: &[StatisticPoint], kind: ItemKind) -> Result<MarketSummary, AggregateError> {
    let mut relevant = points.iter().filter(|p| kind.keeps(p));

    let (today, yesterday) = match (relevant.next(), relevant.next()) {
        (Some(today), Some(yesterday)) => (today, yesterday),
        _ => {
            let available = points.iter().filter(|p| kind.keeps(p)).count();
            return Err(AggregateError::InsufficientData { available });
        }
    };

    let total_volume = today.volume.saturating_add(yesterday.volume);
    if total_volume == 0 {
        return Err(AggregateError::NoVolume);
    }

    let total_volume = total_volume as f64;
    let traded_value =
        today.avg_price * today.volume as f64 + yesterday.avg_price * yesterday.volume as f64;

    Ok(MarketSummary {
        weighted_avg_price: traded_value / total_volume,
        avg_volume: total_volume / 2.0,
    })
}
