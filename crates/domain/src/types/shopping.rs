//! Household shopping-list rows and match results

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A row of the household shopping list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingListEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub complete: bool,
}

impl ShoppingListEntry {
    pub fn open(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), complete: false }
    }
}

/// The list entry chosen for one basket item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListMatch {
    pub entry: ShoppingListEntry,
    /// Combined similarity in `[0, 1]`.
    pub similarity: f64,
}

/// Basket item name → best list entry at or above the threshold.
pub type MatchResult = BTreeMap<String, ListMatch>;
