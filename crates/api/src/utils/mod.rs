//! Shared helpers for the binary
pub mod logging;
