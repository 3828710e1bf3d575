//! # Harvest Domain
//!
//! Business domain types and models for Harvest.
//!
//! This crate contains:
//! - Schedule feed records (schedule entries, pause records)
//! - Order records (line items and unit overrides)
//! - The resolved delivery and shopping-list match types
//! - Domain error types and Result definitions
//! - Configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other Harvest crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
