//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Refresh cycle
pub const DEFAULT_SCAN_INTERVAL_SECS: u64 = 900;
pub const DEFAULT_JOB_TIMEOUT_SECS: u64 = 120;

// Shopping list matching
pub const DEFAULT_MATCH_THRESHOLD_PERCENT: u8 = 80;
pub const SUBSTRING_SIMILARITY_FLOOR: f64 = 0.85;
pub const CHARACTER_WEIGHT: f64 = 0.7;
pub const WORD_WEIGHT: f64 = 0.3;

// Order items
pub const DEFAULT_ITEM_QUANTITY: f64 = 1.0;
pub const UNKNOWN_ITEM_NAME: &str = "Unknown";

// Upstream HTTP
pub const CONFLICT_STATUS: u16 = 409;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SESSION_TTL_SECS: i64 = 3600;
