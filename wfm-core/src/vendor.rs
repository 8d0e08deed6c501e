//! Vendors and their standing price table

use prettytable::format::{FormatBuilder, LinePosition, LineSeparator, TableFormat};
use prettytable::{Cell, Row, Table};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::item::Item;

/// A named collection of items sold for standing
///
/// Items are shared so batch tasks can hold on to them while the caller
/// keeps the vendor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    pub name: String,
    pub items: Vec<Arc<Item>>,
}

impl Vendor {
    pub fn new(name: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            name: name.into(),
            items: items.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn item(&self, name: &str) -> Option<&Arc<Item>> {
        self.items.iter().find(|i| i.name == name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items ordered by kind, then by name
    pub fn sorted_items(&self) -> Vec<&Arc<Item>> {
        let mut items: Vec<_> = self.items.iter().collect();
        items.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.name.cmp(&b.name)));
        items
    }
}

const TABLE_HEADERS: [&str; 6] = [
    "Name",
    "Type",
    "Standing",
    "Price",
    "Volume",
    "Standing/Plat (lower is better)",
];

/// Borderless layout: two spaces between columns, dashes under the headers
fn table_format() -> TableFormat {
    FormatBuilder::new()
        .column_separator(' ')
        .padding(0, 1)
        .separators(&[LinePosition::Title], LineSeparator::new('-', ' ', ' ', ' '))
        .build()
}

impl Vendor {
    fn to_table(&self) -> Table {
        let mut table = Table::new();
        table.set_format(table_format());
        table.set_titles(Row::new(TABLE_HEADERS.iter().map(|h| Cell::new(h)).collect()));

        for item in self.sorted_items() {
            let market = item.market();
            table.add_row(Row::new(vec![
                Cell::new(&item.name),
                Cell::new(item.kind.display_name()),
                Cell::new(&item.standing_cost.to_string()),
                Cell::new(&format!("{:.2}", market.weighted_avg_price)),
                Cell::new(&format!("{:.2}", market.avg_volume)),
                Cell::new(&format!("{:.2}", item.standing_per_plat())),
            ]));
        }
        table
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Cells are padded to the column width, so drop the trailing run
        let rendered = self.to_table().to_string();
        for (i, line) in rendered.lines().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
