//! # Harvest App
//!
//! Application layer - command handlers and wiring.
//!
//! This crate contains:
//! - Application context (dependency injection)
//! - Command handlers behind the `harvest` binary
//! - Logging initialisation
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod commands;
pub mod context;
pub mod utils;

pub use context::AppContext;
