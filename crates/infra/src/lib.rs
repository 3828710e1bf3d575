//! # Harvest Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - Configuration loading (environment and JSON/TOML files)
//! - The HTTP client and upstream error mapping
//! - Upstream integrations (OekoBox shops, Amperhof, the shopping list file)
//! - The periodic refresh scheduler
//!
//! ## Architecture
//! - Implements traits defined in `harvest-core`
//! - Depends on `harvest-domain` and `harvest-core`
//! - Contains all "impure" code (network, files, timers)

pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod scheduling;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::{
    build_provider, build_service, AmperhofProvider, FileShoppingList, OekoboxSource,
};
pub use scheduling::{RefreshJob, RefreshScheduler, RefreshSchedulerConfig, SchedulerError};
