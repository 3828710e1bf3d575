//! OekoBox Online shop integration
//!
//! Implements the core [`harvest_core::DeliverySource`] port over the shop's
//! JSON API: session logon, the dates feed, order items and pause windows.

mod client;
mod wire;

pub use client::{OekoboxSource, DEFAULT_OEKOBOX_BASE_URL};
