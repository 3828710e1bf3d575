//! # Harvest Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Schedule classification and next-delivery resolution
//! - The pause controller and its conflict policy
//! - Shopping-list normalisation, similarity and matching
//! - The reconciliation service driving one refresh cycle
//! - Port/adapter interfaces (traits) for every collaborator
//!
//! ## Architecture Principles
//! - Only depends on `harvest-domain`
//! - No HTTP, file or platform code
//! - All external dependencies via traits
//! - Time is injected through [`Clock`]

pub mod clock;
pub mod delivery;
pub mod reconcile;
pub mod shopping;

pub use clock::{Clock, FixedClock, SystemClock};
pub use delivery::ports::{DeliveryProvider, DeliverySource};
pub use delivery::{
    NextDeliveryResolver, PauseController, PauseOutcome, PausePolicy, ScheduleProvider,
    SessionSource,
};
pub use reconcile::{ReconciliationService, RefreshOutcome};
pub use shopping::ports::ShoppingList;
pub use shopping::ShoppingListMatcher;
