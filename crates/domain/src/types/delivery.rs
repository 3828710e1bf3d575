//! The resolved next delivery

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A resolved, display-ready line item of the next delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasketItem {
    pub name: String,
    pub quantity: f64,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,
}

impl BasketItem {
    pub fn new(name: impl Into<String>, quantity: f64) -> Self {
        Self { name: name.into(), quantity, unit: None, product_id: None }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

/// Outcome of one next-delivery resolution.
///
/// Invariant: when `delivery_date` is `None`, `items` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub delivery_date: Option<NaiveDate>,
    pub items: Vec<BasketItem>,
    pub is_paused: bool,
    /// Capability of the data source, not of this particular delivery.
    pub supports_pause: bool,
    #[serde(default)]
    pub last_order_change: Option<NaiveDateTime>,
}

impl Delivery {
    /// A delivery result for "nothing scheduled".
    pub fn empty(supports_pause: bool) -> Self {
        Self {
            delivery_date: None,
            items: Vec::new(),
            is_paused: false,
            supports_pause,
            last_order_change: None,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.delivery_date.is_some()
    }

    pub fn total_items(&self) -> usize {
        self.items.len()
    }
}
