mod common;

use axum::http::StatusCode;
use common::TestApp;

#[tokio::test]
async fn test_health_endpoint_success() {
    let app = TestApp::new();
    app.links.insert("health01", "https://example.com");

    let response = app.server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["database"]["message"], "Connected, 1 links");
    assert_eq!(json["checks"]["event_bus"]["status"], "ok");
}

#[tokio::test]
async fn test_health_without_subscriber_is_degraded() {
    let app = TestApp::without_aggregator();

    let response = app.server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["event_bus"]["status"], "error");
}

#[tokio::test]
async fn test_health_database_down_is_degraded() {
    let app = TestApp::new();
    app.links.set_down(true);

    let response = app.server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["database"]["status"], "error");
    assert_eq!(json["checks"]["event_bus"]["status"], "ok");
}

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::new();

    let response = app.server.get("/health").await;

    assert_ne!(response.status_code(), 401);
}
