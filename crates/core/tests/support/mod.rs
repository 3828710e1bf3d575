//! Shared test helpers for `harvest-core` integration tests.
//!
//! In-memory mocks for the delivery source and shopping-list ports plus a
//! few fixtures, so tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod shopping;
pub mod source;

use chrono::{Duration, NaiveDate};
use harvest_domain::{FeedRecord, OrderLineItem, OrderRecord, OrderState, ScheduleEntry};

/// Wednesday, so the pause week is easy to reason about.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
}

pub fn days_from_today(days: i64) -> NaiveDate {
    today() + Duration::days(days)
}

pub fn pending_slot(days: i64, order_id: i64) -> FeedRecord {
    FeedRecord::Delivery(ScheduleEntry::new(days_from_today(days), order_id, OrderState::Pending))
}

pub fn line_item(item_id: i64, name: &str, unit: &str, quantity: f64) -> OrderRecord {
    OrderRecord::Item(OrderLineItem {
        item_id: Some(item_id),
        name: name.into(),
        unit: Some(unit.into()),
        quantity: Some(quantity),
    })
}
