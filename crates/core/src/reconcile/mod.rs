//! Refresh-cycle orchestration

pub mod service;

pub use service::{ReconciliationService, RefreshOutcome};
