use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;
use youinc_core::clock::ManualClock;
use youinc_server::{api::app_router, build_state_with_clock, config::Config};

struct TestApp {
    _dir: TempDir,
    clock: Arc<ManualClock>,
    router: Router,
}

fn test_config(dir: &TempDir) -> Config {
    Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: dir.path().join("test.db").to_string_lossy().to_string(),
        account_id: "me".to_string(),
        market_tz: chrono_tz::Europe::London,
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(30),
        decay_grace: Duration::from_millis(2_000),
        decay_scheduler: false,
    }
}

async fn build_test_app() -> TestApp {
    let dir = tempdir().unwrap();
    let config = test_config(&dir);
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 1, 15, 15, 30, 0).unwrap(),
    ));
    let state = build_state_with_clock(&config, clock.clone()).await.unwrap();
    TestApp {
        _dir: dir,
        clock,
        router: app_router(state, &config),
    }
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn healthz_responds() {
    let app = build_test_app().await;
    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/api/v1/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn fresh_ledger_has_defaults() {
    let app = build_test_app().await;
    let (status, body) = send(&app.router, Method::GET, "/api/v1/ledger", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valuation"], 10_000);
    assert_eq!(body["transactions"], json!([]));
}

#[tokio::test]
async fn events_are_applied_and_persisted() {
    let app = build_test_app().await;

    let (status, applied) = send(
        &app.router,
        Method::POST,
        "/api/v1/ledger/events",
        Some(json!({ "type": "goalComplete" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(applied["valuation"], 10_400);

    let (status, _) = send(
        &app.router,
        Method::POST,
        "/api/v1/ledger/events",
        Some(json!({ "type": "buy", "activity": "coffee" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, ledger) = send(&app.router, Method::GET, "/api/v1/ledger", None).await;
    assert_eq!(ledger["valuation"], 10_425);
    assert_eq!(ledger["transactions"][0]["label"], "BUY: coffee");
    assert_eq!(ledger["transactions"][1]["label"], "Goal complete");
}

#[tokio::test]
async fn invalid_requests_are_rejected() {
    let app = build_test_app().await;

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/api/v1/ledger/deltas",
        Some(json!({ "kind": "rocket", "label": "x", "delta": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let (status, _) = send(
        &app.router,
        Method::POST,
        "/api/v1/ledger/events",
        Some(json!({ "type": "buy", "activity": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app.router,
        Method::POST,
        "/api/v1/ledger/events",
        Some(json!({ "type": "lottery" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, ledger) = send(&app.router, Method::GET, "/api/v1/ledger", None).await;
    assert_eq!(ledger["transactions"], json!([]));
}

#[tokio::test]
async fn raw_deltas_go_through_the_tax_rule() {
    let app = build_test_app().await;
    let (status, applied) = send(
        &app.router,
        Method::POST,
        "/api/v1/ledger/deltas",
        Some(json!({ "kind": "good", "label": "Read a book", "delta": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(applied["tax"]["effectiveDelta"], 100);
    assert_eq!(applied["tax"]["wasTaxed"], false);
    assert_eq!(applied["transaction"]["label"], "Read a book");
}

#[tokio::test]
async fn candles_follow_the_requested_timeframe() {
    let app = build_test_app().await;
    send(
        &app.router,
        Method::POST,
        "/api/v1/ledger/events",
        Some(json!({ "type": "goalComplete" })),
    )
    .await;

    let (status, series) = send(&app.router, Method::GET, "/api/v1/ledger/candles?timeframe=4h", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(series["timeframe"], "4h");
    assert_eq!(series["candles"].as_array().unwrap().len(), 90);

    let (status, series) = send(&app.router, Method::GET, "/api/v1/ledger/candles", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(series["timeframe"], "1d");
    assert_eq!(series["candles"].as_array().unwrap().len(), 60);

    let (status, _) = send(&app.router, Method::GET, "/api/v1/ledger/candles?timeframe=2h", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn decay_catch_up_is_idempotent_within_an_hour() {
    let app = build_test_app().await;

    let (status, first) = send(&app.router, Method::POST, "/api/v1/ledger/decay", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["status"], "bootstrapped");

    let (_, again) = send(&app.router, Method::POST, "/api/v1/ledger/decay", None).await;
    assert_eq!(again["status"], "upToDate");

    app.clock.advance(chrono::Duration::hours(3));
    let (_, charged) = send(&app.router, Method::POST, "/api/v1/ledger/decay", None).await;
    assert_eq!(charged["status"], "charged");
    assert_eq!(charged["openBuckets"], 3);
    assert_eq!(charged["delta"], -15);

    let (_, ledger) = send(&app.router, Method::GET, "/api/v1/ledger", None).await;
    assert_eq!(ledger["valuation"], 9_985);
    assert_eq!(ledger["transactions"][0]["label"], "Decay x3");
}

#[tokio::test]
async fn decay_status_reports_disabled_scheduler() {
    let app = build_test_app().await;
    let (status, body) = send(&app.router, Method::GET, "/api/v1/ledger/decay/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["enabled"], false);
    assert_eq!(body["degraded"], false);
    assert_eq!(body["status"], Value::Null);
}

#[tokio::test]
async fn tax_preview_does_not_touch_the_ledger() {
    let app = build_test_app().await;
    let (status, preview) = send(
        &app.router,
        Method::POST,
        "/api/v1/tax/preview",
        Some(json!({ "kind": "addiction", "delta": 100, "valuation": 250_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(preview["effectiveDelta"], 25);
    assert_eq!(preview["wasTaxed"], true);

    let (_, ledger) = send(&app.router, Method::GET, "/api/v1/ledger", None).await;
    assert_eq!(ledger["transactions"], json!([]));
}

#[tokio::test]
async fn market_status_reports_the_closed_window() {
    let app = build_test_app().await;
    let closed_at = Utc.with_ymd_and_hms(2024, 1, 15, 5, 0, 0).unwrap().timestamp_millis();
    let (status, body) = send(
        &app.router,
        Method::GET,
        &format!("/api/v1/market/status?at={}", closed_at),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["open"], false);
    assert_eq!(body["timezone"], "Europe/London");

    // Defaults to the clock: 15:30 is open.
    let (_, body) = send(&app.router, Method::GET, "/api/v1/market/status", None).await;
    assert_eq!(body["open"], true);
}
