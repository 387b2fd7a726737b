//! Integration tests for the HTML views.

mod common;

use axum::http::StatusCode;
use std::sync::Arc;

use common::{FakeSource, TestApp};

#[tokio::test]
async fn test_dashboard_without_data() {
    let app = TestApp::new().await;

    let response = app.server().get("/").await;
    response.assert_status_ok();
    let html = response.text();

    assert!(html.contains("Nothing currently transferring."));
    assert!(html.contains("Rclone API Connection"));
    assert!(html.contains("Failed"));
    assert!(html.contains("N/A"));
}

#[tokio::test]
async fn test_dashboard_renders_formatted_values() {
    let app = TestApp::new().await;
    app.push_sample().await;

    let html = app.server().get("/").await.text();

    assert!(html.contains("0.94 GB"));
    assert!(html.contains("163.68 MB"));
    assert!(html.contains("1.50 MB/s"));
    assert!(html.contains("3.43 MB/s"));
    assert!(html.contains("42%"));
    assert!(html.contains("1d1h1m1s"));
    assert!(html.contains("readme.txt"));
    assert!(!html.contains("Nothing currently transferring."));
}

#[tokio::test]
async fn test_dashboard_escapes_file_names() {
    let app = TestApp::new().await;
    app.push_sample().await;

    let html = app.server().get("/").await.text();

    assert!(html.contains("big &lt;file&gt;.mkv"));
    assert!(!html.contains("<file>"));
}

#[tokio::test]
async fn test_history_page() {
    let app = TestApp::new().await;

    let response = app.server().get("/history").await;
    response.assert_status_ok();
    let html = response.text();

    let second = html.find("second.bin").unwrap();
    let first = html.find("first.bin").unwrap();
    assert!(second < first);
    assert!(html.contains("2.00 MB"));
    assert!(html.contains("1m30s"));
}

#[tokio::test]
async fn test_history_page_upstream_down() {
    let app = TestApp::with_source(Some(Arc::new(FakeSource::offline()))).await;

    let response = app.server().get("/history").await;
    response.assert_status_ok();
    assert!(response.text().contains("Could not reach the rclone API"));
}

#[tokio::test]
async fn test_theme_toggle_persists_and_redirects() {
    let app = TestApp::new().await;

    let response = app
        .server()
        .post("/preferences/theme")
        .form(&[("return_to", "/history")])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/history");

    assert!(app.state().preferences.get().await.dark_mode);
    let html = app.server().get("/").await.text();
    assert!(html.contains(r#"<html lang="en" class="dark">"#));
}

#[tokio::test]
async fn test_toggle_ignores_offsite_return() {
    let app = TestApp::new().await;

    let response = app
        .server()
        .post("/preferences/drawer")
        .form(&[("return_to", "//evil.example")])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/");
    assert!(app.state().preferences.get().await.drawer_open);
}

#[tokio::test]
async fn test_unit_toggle_switches_to_bits() {
    let app = TestApp::new().await;
    app.push_sample().await;

    app.server()
        .post("/preferences/unit")
        .form(&[("return_to", "/")])
        .await
        .assert_status(StatusCode::SEE_OTHER);

    let html = app.server().get("/").await.text();
    assert!(html.contains("12.00 Mbps"));
}

#[tokio::test]
async fn test_not_found_page() {
    let app = TestApp::new().await;

    let response = app.server().get("/no/such/page").await;

    response.assert_status_not_found();
    assert!(response.text().contains("Nothing lives at"));
}

#[tokio::test]
async fn test_static_stylesheet() {
    let app = TestApp::new().await;

    let response = app.server().get("/static/app.css").await;
    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "text/css");

    app.server()
        .get("/static/missing.js")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_dashboard_connected_in_push_mode() {
    let app = TestApp::with_source(None).await;
    app.push_sample().await;

    let html = app.server().get("/").await.text();

    assert!(html.contains("Connected"));
    assert!(!html.contains("Failed"));
    assert!(html.contains("1.50 MB/s"));
}
