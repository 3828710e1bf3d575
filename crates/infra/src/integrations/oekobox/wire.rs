//! Wire shapes of the OekoBox shop API and their mapping onto domain records.
//!
//! The feeds are heterogeneous JSON arrays discriminated by a `type` field.
//! Every accepted variation (dates with or without time, pauses keyed by a
//! single day or a range, ids as numbers or strings) is folded here once so
//! the core never sees upstream spelling.

use chrono::NaiveDateTime;
use harvest_domain::constants::UNKNOWN_ITEM_NAME;
use harvest_domain::{
    FeedRecord, OrderLineItem, OrderRecord, OrderState, PauseRecord, PauseWindow, ScheduleEntry,
    UnitOverride,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::integrations::dates::{parse_date, parse_datetime};

/// Identifier that upstream sends either as a number or as a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FlexibleText {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FlexibleText {
    fn into_string(self) -> String {
        match self {
            Self::Integer(value) => value.to_string(),
            Self::Float(value) => value.to_string(),
            Self::Text(value) => value,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ShopDateWire {
    delivery_date: String,
    #[serde(default)]
    order_id: Option<i64>,
    #[serde(default)]
    order_state: Option<i64>,
    #[serde(default)]
    is_paused: Option<bool>,
    #[serde(default)]
    last_order_change: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PauseWire {
    #[serde(default)]
    id: Option<FlexibleText>,
    #[serde(default)]
    delivery_date: Option<String>,
    #[serde(default)]
    date_from: Option<String>,
    #[serde(default)]
    date_to: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ItemWire {
    #[serde(default)]
    item_id: Option<i64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    amount_def: Option<f64>,
    #[serde(default)]
    amount: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct XUnitWire {
    #[serde(default)]
    item_id: Option<i64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    parts: Option<FlexibleText>,
}

/// Body of the logon call.
#[derive(Debug, Deserialize)]
pub(crate) struct LogonResponse {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl LogonResponse {
    pub(crate) fn is_ok(&self) -> bool {
        self.result.as_deref().is_some_and(|result| result.eq_ignore_ascii_case("ok"))
    }
}

/// Body of the add-pause call.
#[derive(Debug, Serialize)]
pub(crate) struct PauseRequest {
    pub from: String,
    pub to: String,
    pub auto_cancel: bool,
}

impl PauseRequest {
    pub(crate) fn new(from: NaiveDateTime, to: NaiveDateTime, auto_cancel: bool) -> Self {
        Self { from: format_datetime(from), to: format_datetime(to), auto_cancel }
    }
}

fn format_datetime(value: NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S%.3f").to_string()
}

fn record_kind(value: &Value) -> String {
    value
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Map the dates feed onto domain records, in feed order.
///
/// Records that fail to decode are skipped with a warning.
pub(crate) fn parse_feed(values: Vec<Value>) -> Vec<FeedRecord> {
    values
        .into_iter()
        .filter_map(|value| {
            let kind = record_kind(&value);
            match kind.as_str() {
                "shopdate" | "date" => decode::<ShopDateWire>(value, "shop date")
                    .and_then(shop_date_record),
                "pause" => decode::<PauseWire>(value, "pause").and_then(pause_record),
                _ => Some(FeedRecord::Other { kind }),
            }
        })
        .collect()
}

/// Map an order's item feed onto domain records, in feed order.
pub(crate) fn parse_order_items(values: Vec<Value>) -> Vec<OrderRecord> {
    values
        .into_iter()
        .filter_map(|value| match record_kind(&value).as_str() {
            "xunit" => decode::<XUnitWire>(value, "unit override").and_then(unit_override),
            _ => decode::<ItemWire>(value, "order item").map(line_item),
        })
        .collect()
}

fn decode<T>(value: Value, what: &str) -> Option<T>
where
    T: for<'de> Deserialize<'de>,
{
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            warn!(record = what, error = %err, "Skipping malformed upstream record");
            None
        }
    }
}

fn shop_date_record(wire: ShopDateWire) -> Option<FeedRecord> {
    let Some(delivery_date) = parse_date(&wire.delivery_date) else {
        warn!(raw = %wire.delivery_date, "Skipping shop date with unparseable date");
        return None;
    };
    let mut entry = ScheduleEntry::new(
        delivery_date,
        wire.order_id.unwrap_or_default(),
        OrderState::from(wire.order_state.unwrap_or(-1)),
    );
    entry.is_paused = wire.is_paused;
    entry.last_order_change = wire.last_order_change.as_deref().and_then(parse_datetime);
    Some(FeedRecord::Delivery(entry))
}

fn pause_record(wire: PauseWire) -> Option<FeedRecord> {
    let id = wire.id.map(FlexibleText::into_string);
    let window = match (wire.delivery_date.as_deref(), wire.date_from.as_deref(), wire.date_to.as_deref()) {
        (Some(day), _, _) => parse_date(day).map(|date| PauseWindow::Day { date }),
        (None, Some(from), Some(to)) => match (parse_date(from), parse_date(to)) {
            (Some(from), Some(to)) => Some(PauseWindow::Range { from, to }),
            _ => None,
        },
        _ => None,
    };
    match window {
        Some(window) => Some(FeedRecord::Pause(PauseRecord { id, window })),
        None => {
            warn!(pause_id = ?id, "Skipping pause record without a usable date");
            None
        }
    }
}

fn line_item(wire: ItemWire) -> OrderRecord {
    let name = wire
        .name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_ITEM_NAME.to_string());
    OrderRecord::Item(OrderLineItem {
        item_id: wire.item_id,
        name,
        unit: wire.unit,
        quantity: wire.amount_def.or(wire.amount),
    })
}

fn unit_override(wire: XUnitWire) -> Option<OrderRecord> {
    let item_id = wire.item_id.filter(|id| *id != 0)?;
    Some(OrderRecord::Override(UnitOverride {
        item_id,
        unit_name: wire.name,
        parts: wire.parts.map(FlexibleText::into_string),
    }))
}
