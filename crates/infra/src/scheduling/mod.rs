//! Scheduling infrastructure for the periodic refresh
//!
//! The scheduler follows the workspace runtime rules:
//! - Explicit lifecycle management (start/stop)
//! - Join handles for spawned tasks
//! - Cancellation token support
//! - Timeout wrapping on all async operations

pub mod error;
pub mod refresh_scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use refresh_scheduler::{RefreshJob, RefreshScheduler, RefreshSchedulerConfig};
