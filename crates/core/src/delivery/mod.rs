//! Next-delivery resolution and the pause state machine

pub mod classifier;
pub mod pause;
pub mod pauses;
pub mod ports;
pub mod provider;
pub mod resolver;
pub mod session;

pub use pause::{PauseController, PauseOutcome, PausePolicy};
pub use provider::ScheduleProvider;
pub use resolver::{NextDeliveryResolver, Resolution};
pub use session::SessionSource;
