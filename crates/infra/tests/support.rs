//! Shared helpers for infra integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use harvest_core::{Clock, FixedClock};
use harvest_infra::integrations::OekoboxSource;
use harvest_infra::HttpClient;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SHOP_ID: &str = "gemuesekiste";
pub const SESSION_ID: &str = "session-abc123";

/// Wednesday; the next delivery in the fixtures is the Friday after.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 15).expect("valid fixture date")
}

pub fn clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(today()))
}

/// HTTP client without backoff so retry tests stay fast.
pub fn fast_http() -> HttpClient {
    HttpClient::builder()
        .timeout(Duration::from_secs(5))
        .base_backoff(Duration::ZERO)
        .build()
        .expect("http client should build")
}

pub fn shop_path(suffix: &str) -> String {
    format!("/{SHOP_ID}{suffix}")
}

pub fn oekobox_source(server: &MockServer) -> OekoboxSource {
    OekoboxSource::new(fast_http(), &server.uri(), SHOP_ID, "household@example.org", "hunter2")
}

/// Accept logons and hand out [`SESSION_ID`].
pub async fn mount_logon(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(shop_path("/api/logon")))
        .and(body_string_contains("guest=false"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Set-Cookie", format!("JSESSIONID={SESSION_ID}; Path=/; HttpOnly"))
                .set_body_json(json!({"result": "ok"})),
        )
        .mount(server)
        .await;
}

/// Dates feed with one pending delivery on Friday (order 42) and noise.
pub fn dates_feed() -> serde_json::Value {
    json!([
        {"type": "ShopDate", "delivery_date": "2024-05-10", "order_id": 41, "order_state": 2},
        {"type": "ShopDate", "delivery_date": "2024-05-17T00:00:00", "order_id": 42,
         "order_state": 0, "last_order_change": "2024-05-14T09:30:00"},
        {"type": "ShopDate", "delivery_date": "2024-05-24", "order_id": 0, "order_state": 0},
        {"type": "Tour", "name": "north"}
    ])
}

pub fn order_items() -> serde_json::Value {
    json!([
        {"type": "Item", "item_id": 7, "name": "Organic Carrots", "unit": "kg", "amount_def": 1.5},
        {"type": "Item", "item_id": 8, "name": "Fresh Leeks", "unit": "piece", "amount": 2},
        {"type": "XUnit", "item_id": 8, "name": "bunch", "parts": "3"}
    ])
}
