//! Shopping-list reconciliation

pub mod matcher;
pub mod normalize;
pub mod ports;

pub use matcher::{match_entries, similarity, ShoppingListMatcher};
pub use normalize::normalize;
