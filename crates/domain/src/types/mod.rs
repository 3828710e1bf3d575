//! Domain data types
//!
//! - [`schedule`]: upstream calendar slots and pause windows
//! - [`order`]: order line items and their unit overrides
//! - [`delivery`]: the resolved next delivery
//! - [`shopping`]: household shopping-list rows and match results

pub mod delivery;
pub mod order;
pub mod schedule;
pub mod shopping;

pub use delivery::{BasketItem, Delivery};
pub use order::{OrderLineItem, OrderRecord, UnitOverride};
pub use schedule::{FeedRecord, OrderState, PauseRecord, PauseWindow, ScheduleEntry};
pub use shopping::{ListMatch, MatchResult, ShoppingListEntry};
