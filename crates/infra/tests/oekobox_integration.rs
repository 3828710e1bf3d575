//! Integration tests for the OekoBox source
//!
//! **Coverage:**
//! - Logon: session cookie captured, rejected logons surface as auth errors
//! - Feed and items: resolution end to end through the schedule provider
//! - Pause: full-week window, 409 conflict with and without auto-cancel
//! - Unpause: pause record lookup and removal
//! - Session expiry: one re-logon and retry
//!
//! **Infrastructure:**
//! - WireMock HTTP server standing in for the shop API

#[path = "support.rs"]
mod support;

use std::sync::Arc;

use chrono::NaiveDate;
use harvest_core::{DeliveryProvider, DeliverySource, PauseOutcome, PausePolicy, ScheduleProvider};
use harvest_domain::HarvestError;
use serde_json::json;
use support::{
    clock, dates_feed, mount_logon, oekobox_source, order_items, shop_path, SESSION_ID,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer, auto_cancel_on_conflict: bool) -> ScheduleProvider {
    ScheduleProvider::new(
        Arc::new(oekobox_source(server)),
        PausePolicy { auto_cancel_on_conflict },
        clock(),
    )
}

fn session_cookie() -> String {
    format!("JSESSIONID={SESSION_ID}")
}

async fn mount_feed(server: &MockServer, feed: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(shop_path("/api/client/dates")))
        .and(header("cookie", session_cookie().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed))
        .mount(server)
        .await;
}

fn week_window(auto_cancel: bool) -> serde_json::Value {
    json!({
        "from": "2024-05-13T00:00:00.000",
        "to": "2024-05-19T23:59:59.999",
        "auto_cancel": auto_cancel,
    })
}

#[tokio::test]
async fn logon_rejection_is_an_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(shop_path("/api/logon")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"result": "error", "message": "wrong password"})),
        )
        .mount(&server)
        .await;

    let err = oekobox_source(&server).authenticate().await.expect_err("logon must fail");
    assert!(matches!(err, HarvestError::Auth(ref msg) if msg.contains("wrong password")));
}

#[tokio::test]
async fn calls_without_session_fail_before_any_request() {
    let server = MockServer::start().await;

    let err = oekobox_source(&server).list_schedule().await.expect_err("no session");
    assert!(err.is_auth());
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn resolves_next_delivery_with_unit_overrides() {
    let server = MockServer::start().await;
    mount_logon(&server).await;
    mount_feed(&server, dates_feed()).await;
    Mock::given(method("GET"))
        .and(path(shop_path("/api/client/order/42/items")))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_items()))
        .expect(1)
        .mount(&server)
        .await;

    let delivery = provider(&server, false).resolve_next().await.expect("resolution succeeds");

    assert_eq!(delivery.delivery_date, NaiveDate::from_ymd_opt(2024, 5, 17));
    assert!(!delivery.is_paused);
    assert!(delivery.supports_pause);
    assert!(delivery.last_order_change.is_some());
    assert_eq!(delivery.total_items(), 2);

    let carrots = &delivery.items[0];
    assert_eq!(carrots.name, "Organic Carrots");
    assert_eq!(carrots.quantity, 1.5);
    assert_eq!(carrots.unit.as_deref(), Some("kg"));
    assert_eq!(carrots.product_id.as_deref(), Some("7"));

    let leeks = &delivery.items[1];
    assert_eq!(leeks.quantity, 3.0);
    assert_eq!(leeks.unit.as_deref(), Some("bunch"));
}

#[tokio::test]
async fn pause_record_in_feed_marks_delivery_paused() {
    let server = MockServer::start().await;
    mount_logon(&server).await;
    mount_feed(
        &server,
        json!([
            {"type": "ShopDate", "delivery_date": "2024-05-17", "order_id": 42, "order_state": 0},
            {"type": "Pause", "id": 99, "date_from": "2024-05-13", "date_to": "2024-05-19"}
        ]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path(shop_path("/api/client/order/42/items")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let delivery = provider(&server, false).resolve_next().await.expect("resolution succeeds");
    assert!(delivery.is_paused);
    assert!(delivery.items.is_empty());
}

#[tokio::test]
async fn pause_sends_the_whole_week() {
    let server = MockServer::start().await;
    mount_logon(&server).await;
    mount_feed(&server, dates_feed()).await;
    Mock::given(method("POST"))
        .and(path(shop_path("/api/client/pause")))
        .and(body_partial_json(week_window(false)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = provider(&server, false).pause_next().await;
    assert_eq!(
        outcome,
        PauseOutcome::Paused {
            week_start: NaiveDate::from_ymd_opt(2024, 5, 13).unwrap(),
            auto_cancelled: false,
        }
    );
}

#[tokio::test]
async fn conflict_without_auto_cancel_is_not_retried() {
    let server = MockServer::start().await;
    mount_logon(&server).await;
    mount_feed(&server, dates_feed()).await;
    Mock::given(method("POST"))
        .and(path(shop_path("/api/client/pause")))
        .respond_with(ResponseTemplate::new(409).set_body_string("basket already planned"))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = provider(&server, false).pause_next().await;
    assert_eq!(outcome, PauseOutcome::Conflict);
    assert!(!bool::from(outcome));
}

#[tokio::test]
async fn conflict_with_auto_cancel_retries_once() {
    let server = MockServer::start().await;
    mount_logon(&server).await;
    mount_feed(&server, dates_feed()).await;
    Mock::given(method("POST"))
        .and(path(shop_path("/api/client/pause")))
        .and(body_partial_json(json!({"auto_cancel": false})))
        .respond_with(ResponseTemplate::new(409))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(shop_path("/api/client/pause")))
        .and(body_partial_json(week_window(true)))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = provider(&server, true).pause_next().await;
    assert!(matches!(outcome, PauseOutcome::Paused { auto_cancelled: true, .. }));
}

#[tokio::test]
async fn failed_auto_cancel_retry_reports_failure() {
    let server = MockServer::start().await;
    mount_logon(&server).await;
    mount_feed(&server, dates_feed()).await;
    Mock::given(method("POST"))
        .and(path(shop_path("/api/client/pause")))
        .respond_with(ResponseTemplate::new(409))
        .expect(2)
        .mount(&server)
        .await;

    let outcome = provider(&server, true).pause_next().await;
    assert!(!outcome.is_applied());
}

#[tokio::test]
async fn unpause_drops_the_covering_pause() {
    let server = MockServer::start().await;
    mount_logon(&server).await;
    mount_feed(
        &server,
        json!([
            {"type": "ShopDate", "delivery_date": "2024-05-17", "order_id": 42, "order_state": 0},
            {"type": "Pause", "id": "p-17", "delivery_date": "2024-05-17"}
        ]),
    )
    .await;
    Mock::given(method("DELETE"))
        .and(path(shop_path("/api/client/pause/p-17")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = provider(&server, false).unpause_next().await;
    assert_eq!(outcome, PauseOutcome::Resumed { pause_id: "p-17".into() });
}

#[tokio::test]
async fn expired_session_triggers_one_relogon() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(shop_path("/api/logon")))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Set-Cookie", format!("JSESSIONID={SESSION_ID}; Path=/"))
                .set_body_json(json!({"result": "ok"})),
        )
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(shop_path("/api/client/dates")))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_feed(&server, json!([])).await;

    let delivery = provider(&server, false).resolve_next().await.expect("retry succeeds");
    assert!(!delivery.is_scheduled());
}

#[tokio::test]
async fn close_logs_out() {
    let server = MockServer::start().await;
    mount_logon(&server).await;
    Mock::given(method("POST"))
        .and(path(shop_path("/api/logout")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let source = oekobox_source(&server);
    source.authenticate().await.expect("logon");
    source.close().await.expect("close");
    assert!(source.list_schedule().await.expect_err("session dropped").is_auth());
}
