//! HTTP-level tests for the event ingress endpoint.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Local, TimeZone};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt; // for .oneshot()

use storefront_events::{
    app_state::AppState,
    catalog::CatalogClient,
    clock::FixedClock,
    event_log::EventLog,
    log_path::resolve_log_path,
    web::{build_router, EVENT_FAILED, EVENT_RECORDED},
};

fn wall(h: u32, m: u32, s: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 1, 15, h, m, s).unwrap()
}

/// Router over a temp log root with the clock pinned at `now`.
fn test_app(now: DateTime<Local>) -> (Router, FixedClock, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir should be created");
    let clock = FixedClock::new(now);
    let event_log = EventLog::with_clock(temp_dir.path().join("logs"), Arc::new(clock.clone()));
    let catalog = CatalogClient::new("http://127.0.0.1:9/products", Duration::from_secs(1))
        .expect("catalog client");
    let state = AppState::new(event_log, catalog, temp_dir.path().join("public"));
    (build_router(Arc::new(state)), clock, temp_dir)
}

fn post_event(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .uri("/api/event-log")
        .method("POST")
        .header("Content-Type", "application/json")
        .body(body.into())
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

#[tokio::test]
async fn view_details_event_appends_one_line() {
    let now = wall(10, 30, 0);
    let (app, _clock, temp_dir) = test_app(now);

    let payload = json!({
        "timestamp": now.timestamp_millis(),
        "action": "ENTER_PRODUCT_DETAILS",
        "product": "Widget",
        "quantity": 1,
        "price": 19.99,
        "route": "/products.html",
        "agent": "Mozilla/5.0 (X11; Linux x86_64)"
    });

    let response = app.oneshot(post_event(payload.to_string())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, EVENT_RECORDED);

    let path = resolve_log_path(&temp_dir.path().join("logs"), &now);
    let contents = std::fs::read_to_string(path).unwrap();
    assert_eq!(
        contents,
        "2024/01/15 10:30:00|ENTER_PRODUCT_DETAILS|Widget|1|19.99|/products.html\n"
    );
    assert!(!contents.contains("Mozilla"));
}

#[tokio::test]
async fn same_second_events_append_in_arrival_order() {
    let now = wall(10, 30, 0);
    let (app, _clock, temp_dir) = test_app(now);

    for action in ["ENTER_PRODUCT_DETAILS", "BUY", "BUY"] {
        let payload = json!({
            "timestamp": now.timestamp_millis(),
            "action": action,
            "product": "Widget",
            "quantity": 1,
            "price": 19.99,
            "route": "/products.html",
        });
        let response = app
            .clone()
            .oneshot(post_event(payload.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let path = resolve_log_path(&temp_dir.path().join("logs"), &now);
    let contents = std::fs::read_to_string(path).unwrap();
    let actions: Vec<&str> = contents
        .lines()
        .map(|line| line.split('|').nth(1).unwrap())
        .collect();
    assert_eq!(actions, vec!["ENTER_PRODUCT_DETAILS", "BUY", "BUY"]);
    assert!(contents.ends_with('\n'));
    assert!(!contents.contains("\n\n"));
}

#[tokio::test]
async fn events_in_different_hours_land_in_different_buckets() {
    let (app, clock, temp_dir) = test_app(wall(10, 59, 59));
    let root = temp_dir.path().join("logs");

    let response = app
        .clone()
        .oneshot(post_event(json!({ "action": "BUY" }).to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    clock.set(wall(11, 0, 0));
    let response = app
        .oneshot(post_event(json!({ "action": "BUY" }).to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert!(root.join("2024011510").join("20240115105959.txt").is_file());
    assert!(root.join("2024011511").join("20240115110000.txt").is_file());
}

#[tokio::test]
async fn existing_bucket_directory_is_reused() {
    let now = wall(10, 30, 0);
    let (app, _clock, temp_dir) = test_app(now);
    std::fs::create_dir_all(temp_dir.path().join("logs").join("2024011510")).unwrap();

    let response = app
        .oneshot(post_event(json!({ "action": "BUY" }).to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn blocked_bucket_returns_500_without_partial_line() {
    let now = wall(10, 30, 0);
    let (app, _clock, temp_dir) = test_app(now);
    let root = temp_dir.path().join("logs");
    std::fs::create_dir_all(&root).unwrap();
    // a regular file where the hour bucket directory should go
    std::fs::write(root.join("2024011510"), b"").unwrap();

    let response = app
        .oneshot(post_event(json!({ "action": "BUY", "product": "Widget" }).to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, EVENT_FAILED);

    assert_eq!(std::fs::read(root.join("2024011510")).unwrap(), b"");
    assert_eq!(std::fs::read_dir(&root).unwrap().count(), 1);
}

#[tokio::test]
async fn malformed_payload_is_logged_with_placeholders() {
    let now = wall(10, 30, 0);
    let (app, _clock, temp_dir) = test_app(now);

    let response = app.oneshot(post_event("{not json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let path = resolve_log_path(&temp_dir.path().join("logs"), &now);
    let contents = std::fs::read_to_string(path).unwrap();
    assert_eq!(
        contents,
        "NaN/NaN/NaN NaN:NaN:NaN|undefined|undefined|undefined|undefined|undefined\n"
    );
}

#[tokio::test]
async fn array_payload_is_not_read_positionally() {
    let now = wall(10, 30, 0);
    let (app, _clock, temp_dir) = test_app(now);

    let body = json!([now.timestamp_millis(), "BUY", "Widget", 1, 19.99, "/x", "agent"]);
    let response = app.oneshot(post_event(body.to_string())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let path = resolve_log_path(&temp_dir.path().join("logs"), &now);
    let contents = std::fs::read_to_string(path).unwrap();
    assert_eq!(
        contents,
        "NaN/NaN/NaN NaN:NaN:NaN|undefined|undefined|undefined|undefined|undefined\n"
    );
}

#[tokio::test]
async fn non_json_content_type_is_logged_with_placeholders() {
    let now = wall(10, 30, 0);
    let (app, _clock, temp_dir) = test_app(now);

    let payload = json!({ "timestamp": now.timestamp_millis(), "action": "BUY" });
    let request = Request::builder()
        .uri("/api/event-log")
        .method("POST")
        .header("Content-Type", "text/plain")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, EVENT_RECORDED);

    let path = resolve_log_path(&temp_dir.path().join("logs"), &now);
    let contents = std::fs::read_to_string(path).unwrap();
    assert!(contents.starts_with("NaN/NaN/NaN NaN:NaN:NaN|undefined|"));
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let (app, _clock, _temp_dir) = test_app(wall(10, 30, 0));
    let request = Request::builder()
        .uri("/healthz")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json_val: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(json_val["status"], "ok");
}

#[tokio::test]
async fn static_frontend_is_served_verbatim() {
    let (app, _clock, temp_dir) = test_app(wall(10, 30, 0));
    let public = temp_dir.path().join("public");
    std::fs::create_dir_all(&public).unwrap();
    std::fs::write(public.join("products.html"), "<h1>Products</h1>").unwrap();

    let request = Request::builder()
        .uri("/products.html")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "<h1>Products</h1>");
}
