//! Schedule feed records
//!
//! The upstream calendar returns one heterogeneous list. The infra adapter
//! maps every record into [`FeedRecord`] once; everything downstream matches
//! on the variant.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Order state of a calendar slot as reported upstream.
///
/// Upstream encodes the state as an integer; unknown codes are preserved in
/// [`OrderState::Other`] and are never actionable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum OrderState {
    Pending,
    InProgress,
    Done,
    Cancelled,
    Other(i64),
}

impl OrderState {
    /// Only pending and in-progress orders can still be delivered.
    pub fn is_actionable(self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }
}

impl From<i64> for OrderState {
    fn from(code: i64) -> Self {
        match code {
            0 => Self::Pending,
            1 => Self::InProgress,
            2 => Self::Done,
            -1 => Self::Cancelled,
            other => Self::Other(other),
        }
    }
}

impl From<OrderState> for i64 {
    fn from(state: OrderState) -> Self {
        match state {
            OrderState::Pending => 0,
            OrderState::InProgress => 1,
            OrderState::Done => 2,
            OrderState::Cancelled => -1,
            OrderState::Other(code) => code,
        }
    }
}

/// One calendar slot from the upstream feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub delivery_date: NaiveDate,
    /// `0` means no delivery is planned for the slot.
    pub order_id: i64,
    pub order_state: OrderState,
    #[serde(default)]
    pub is_paused: Option<bool>,
    #[serde(default)]
    pub last_order_change: Option<NaiveDateTime>,
}

impl ScheduleEntry {
    pub fn new(delivery_date: NaiveDate, order_id: i64, order_state: OrderState) -> Self {
        Self { delivery_date, order_id, order_state, is_paused: None, last_order_change: None }
    }

    /// Builder-style setter for the feed's own pause flag.
    pub fn with_paused(mut self, paused: bool) -> Self {
        self.is_paused = Some(paused);
        self
    }

    pub fn with_last_order_change(mut self, changed_at: NaiveDateTime) -> Self {
        self.last_order_change = Some(changed_at);
        self
    }

    pub fn has_planned_order(&self) -> bool {
        self.order_id != 0
    }

    pub fn flagged_paused(&self) -> bool {
        self.is_paused.unwrap_or(false)
    }
}

/// Dates a pause record suspends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PauseWindow {
    /// A single delivery date.
    Day { date: NaiveDate },
    /// Inclusive date range.
    Range { from: NaiveDate, to: NaiveDate },
}

impl PauseWindow {
    pub fn covers(&self, date: NaiveDate) -> bool {
        match *self {
            Self::Day { date: day } => day == date,
            Self::Range { from, to } => from <= date && date <= to,
        }
    }
}

/// A suspension window plus the identifier needed to remove it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub window: PauseWindow,
}

impl PauseRecord {
    pub fn day(id: impl Into<String>, date: NaiveDate) -> Self {
        Self { id: Some(id.into()), window: PauseWindow::Day { date } }
    }

    pub fn range(id: impl Into<String>, from: NaiveDate, to: NaiveDate) -> Self {
        Self { id: Some(id.into()), window: PauseWindow::Range { from, to } }
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.window.covers(date)
    }
}

/// One record of the heterogeneous schedule feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum FeedRecord {
    Delivery(ScheduleEntry),
    Pause(PauseRecord),
    /// Any other record kind; carries the upstream type name for logging.
    Other { kind: String },
}
