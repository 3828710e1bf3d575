//! Order line items and unit overrides

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_ITEM_QUANTITY;

/// A concrete item in an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLineItem {
    #[serde(default)]
    pub item_id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub quantity: Option<f64>,
}

impl OrderLineItem {
    /// The item's own quantity, `1.0` when absent or not a usable amount.
    pub fn effective_quantity(&self) -> f64 {
        usable_amount(self.quantity).unwrap_or(DEFAULT_ITEM_QUANTITY)
    }
}

/// Per-item correction that supersedes an item's unit and quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitOverride {
    pub item_id: i64,
    #[serde(default)]
    pub unit_name: Option<String>,
    /// Raw upstream value; numeric text is expected but not guaranteed.
    #[serde(default)]
    pub parts: Option<String>,
}

impl UnitOverride {
    /// `parts` coerced to a quantity, `1.0` when missing or unparseable.
    pub fn quantity(&self) -> f64 {
        let parsed = self
            .parts
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .and_then(|raw| raw.replace(',', ".").parse::<f64>().ok());
        usable_amount(parsed).unwrap_or(DEFAULT_ITEM_QUANTITY)
    }
}

/// One record returned by the order-items lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum OrderRecord {
    Item(OrderLineItem),
    Override(UnitOverride),
}

fn usable_amount(value: Option<f64>) -> Option<f64> {
    value.filter(|amount| amount.is_finite() && *amount >= 0.0)
}
