//! Vendor items and their market summary

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::statistics::StatisticPoint;

/// Kind of tradeable item sold by a vendor
///
/// Declaration order is the display sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "ItemKindRepr")]
pub enum ItemKind {
    /// Mods are traded at different ranks; only rank 0 is priced
    Mod,
    /// Archwing parts
    ArchPart,
    /// Complete weapons
    Weapon,
}

impl ItemKind {
    /// Get the full display name
    pub fn display_name(&self) -> &'static str {
        match self {
            ItemKind::Mod => "Mod",
            ItemKind::ArchPart => "ArchPart",
            ItemKind::Weapon => "Weapon",
        }
    }

    /// Whether a statistic point is relevant when pricing this kind of item
    pub fn keeps(&self, point: &StatisticPoint) -> bool {
        match self {
            ItemKind::Mod => point.is_unranked(),
            ItemKind::ArchPart | ItemKind::Weapon => true,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mod" => Ok(ItemKind::Mod),
            "archpart" | "arch_part" => Ok(ItemKind::ArchPart),
            "weapon" => Ok(ItemKind::Weapon),
            _ => Err(format!("Unknown item kind: {}", s)),
        }
    }
}

impl TryFrom<u8> for ItemKind {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ItemKind::Mod),
            1 => Ok(ItemKind::ArchPart),
            2 => Ok(ItemKind::Weapon),
            _ => Err(format!("Unknown item kind code: {}", code)),
        }
    }
}

/// Catalogs store the kind either as its numeric code or its name
#[derive(Deserialize)]
#[serde(untagged)]
enum ItemKindRepr {
    Code(u8),
    Name(String),
}

impl TryFrom<ItemKindRepr> for ItemKind {
    type Error = String;

    fn try_from(repr: ItemKindRepr) -> Result<Self, Self::Error> {
        match repr {
            ItemKindRepr::Code(code) => ItemKind::try_from(code),
            ItemKindRepr::Name(name) => name.parse(),
        }
    }
}

/// Smoothed price and volume over the two most recent trading days
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSummary {
    /// Volume-weighted average price in platinum
    pub weighted_avg_price: f64,
    /// Average units traded per day
    pub avg_volume: f64,
}

impl MarketSummary {
    pub fn is_empty(&self) -> bool {
        self.weighted_avg_price == 0.0 && self.avg_volume == 0.0
    }
}

/// An item a vendor sells for standing
///
/// The market summary sits behind a lock so the task pricing this item can
/// update it while the vendor is shared with the caller.
#[derive(Debug, Serialize, Deserialize)]
pub struct Item {
    /// warframe.market url name, e.g. `gilded_truth`
    pub name: String,

    #[serde(rename = "type")]
    pub kind: ItemKind,

    /// Standing cost at the vendor
    #[serde(rename = "standing")]
    pub standing_cost: u32,

    #[serde(skip)]
    market: RwLock<MarketSummary>,
}

impl Item {
    pub fn new(name: impl Into<String>, kind: ItemKind, standing_cost: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            standing_cost,
            market: RwLock::new(MarketSummary::default()),
        }
    }

    /// Latest market summary, zeroed until a fetch succeeds
    pub fn market(&self) -> MarketSummary {
        *self.market.read()
    }

    pub fn set_market(&self, summary: MarketSummary) {
        *self.market.write() = summary;
    }

    /// Standing spent per platinum of resale value (lower is better).
    /// Zero when the item has no price yet.
    pub fn standing_per_plat(&self) -> f64 {
        let price = self.market().weighted_avg_price;
        if price == 0.0 {
            return 0.0;
        }
        self.standing_cost as f64 / price
    }
}

impl Clone for Item {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind,
            standing_cost: self.standing_cost,
            market: RwLock::new(self.market()),
        }
    }
}
