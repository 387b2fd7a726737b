//! Integration tests for the stats API.

mod common;

use axum::http::StatusCode;
use std::sync::Arc;

use common::{FakeSource, TestApp, STATS};

#[tokio::test]
async fn test_stats_not_found_before_first_report() {
    let app = TestApp::new().await;

    let response = app.server().get("/api/stats").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_push_then_get_returns_snapshot() {
    let app = TestApp::new().await;

    let response = app.server().post("/api/stats").text(STATS).await;
    response.assert_status(StatusCode::ACCEPTED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["transferring"], 1);
    assert_eq!(body["checking"], 1);

    let response = app.server().get("/api/stats").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    assert_eq!(body["connected"], true);
    let report = &body["report"];
    assert_eq!(report["speed"]["value"], 1500000.0);
    assert_eq!(report["speed"]["unit"], "B/s");
    assert_eq!(report["elapsedTime"]["unit"], "s");
    assert_eq!(report["lastError"], "");
    assert_eq!(report["transferring"][0]["name"], "movies/big <file>.mkv");
    assert_eq!(report["transferring"][0]["size"]["unit"], "B");
    assert_eq!(report["checking"][0], "docs/readme.txt");
}

#[tokio::test]
async fn test_invalid_payload_keeps_previous_snapshot() {
    let app = TestApp::new().await;
    app.push_sample().await;

    let response = app.server().post("/api/stats").text("{not json").await;
    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "invalid_stats");

    let body: serde_json::Value = app.server().get("/api/stats").await.json();
    assert_eq!(body["report"]["transferring"][0]["name"], "movies/big <file>.mkv");
}

#[tokio::test]
async fn test_typed_report_is_not_accepted_as_input() {
    let app = TestApp::new().await;
    app.push_sample().await;

    let body: serde_json::Value = app.server().get("/api/stats").await.json();
    let typed = body["report"].to_string();

    let response = app.server().post("/api/stats").text(typed).await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_new_report_replaces_old() {
    let app = TestApp::new().await;
    app.push_sample().await;

    app.server()
        .post("/api/stats")
        .text(r#"{"speed": 10, "transferring": null}"#)
        .await
        .assert_status(StatusCode::ACCEPTED);

    let body: serde_json::Value = app.server().get("/api/stats").await.json();
    let report = &body["report"];
    assert_eq!(report["speed"]["value"], 10.0);
    assert_eq!(report["transferring"].as_array().unwrap().len(), 0);
    assert!(report["errors"].is_null());
}

#[tokio::test]
async fn test_formatted_stats() {
    let app = TestApp::new().await;
    app.push_sample().await;

    let response = app.server().get("/api/stats/formatted").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    assert_eq!(body["status"]["average_speed"], "1.50 MB/s");
    assert_eq!(body["status"]["errors"], "0");
    assert_eq!(body["status"]["elapsed_time"], "1d1h1m1s");
    assert_eq!(body["status"]["transfer_time"], "1h2m5s");

    let transfer = &body["transfers"][0];
    assert_eq!(transfer["size"], "0.94 GB");
    assert_eq!(transfer["transferred"], "163.68 MB");
    assert_eq!(transfer["progress_label"], "42%");
    assert_eq!(transfer["eta"], "45s");
}

#[tokio::test]
async fn test_formatted_stats_in_bits() {
    let app = TestApp::new().await;
    app.push_sample().await;

    let body: serde_json::Value = app
        .server()
        .get("/api/stats/formatted")
        .add_query_param("unit", "bits")
        .await
        .json();

    assert_eq!(body["status"]["average_speed"], "12.00 Mbps");
}

#[tokio::test]
async fn test_formatted_stats_without_report() {
    let app = TestApp::new().await;

    let body: serde_json::Value = app.server().get("/api/stats/formatted").await.json();

    assert_eq!(body["status"]["connected"], false);
    assert_eq!(body["status"]["average_speed"], "N/A");
    assert_eq!(body["status"]["errors"], "N/A");
    assert_eq!(body["transfers"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_poll_marks_connected() {
    let app = TestApp::new().await;
    app.poll().await;

    let body: serde_json::Value = app.server().get("/api/stats").await.json();
    assert_eq!(body["connected"], true);
    assert_eq!(body["report"]["checks"], 4);
}

#[tokio::test]
async fn test_transferred_newest_first() {
    let app = TestApp::new().await;

    let response = app.server().get("/api/transferred").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    let transferred = body["transferred"].as_array().unwrap();
    assert_eq!(transferred.len(), 2);
    assert_eq!(transferred[0]["name"], "second.bin");
    assert_eq!(transferred[1]["name"], "first.bin");
}

#[tokio::test]
async fn test_transferred_upstream_down() {
    let app = TestApp::with_source(Some(Arc::new(FakeSource::offline()))).await;

    let response = app.server().get("/api/transferred").await;

    response.assert_status(StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_transferred_without_source() {
    let app = TestApp::with_source(None).await;

    let response = app.server().get("/api/transferred").await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let response = app.server().get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_push_without_rclone_source_reports_connected() {
    let app = TestApp::with_source(None).await;

    app.server()
        .post("/api/stats")
        .text("{not json")
        .await
        .assert_status_bad_request();
    let body: serde_json::Value = app.server().get("/api/stats/formatted").await.json();
    assert_eq!(body["status"]["connected"], false);

    app.push_sample().await;

    let body: serde_json::Value = app.server().get("/api/stats/formatted").await.json();
    assert_eq!(body["status"]["connected"], true);
    assert_eq!(body["status"]["average_speed"], "1.50 MB/s");
}
