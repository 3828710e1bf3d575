//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Harvest
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum HarvestError {
    /// Missing or invalid configuration. Fatal, no network call is attempted.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session missing, rejected or expired.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Transient network or upstream API failure.
    #[error("Network error: {0}")]
    Network(String),

    /// The upstream schedule refused a change because it collides with a
    /// planned delivery (HTTP 409).
    #[error("Scheduling conflict (HTTP {status}): {message}")]
    Conflict { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The data source does not offer the requested capability.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl HarvestError {
    /// True when the session has to be re-established before retrying.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// True for the scheduling-conflict kind that drives the pause retry policy.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// True for failures that may succeed on a later refresh cycle.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Io(_))
    }

    /// Stable label suitable for structured logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Auth(_) => "auth",
            Self::Network(_) => "network",
            Self::Conflict { .. } => "conflict",
            Self::NotFound(_) => "not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::Unsupported(_) => "unsupported",
            Self::Io(_) => "io",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;
