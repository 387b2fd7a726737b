//! Integration tests for the preferences API.

mod common;

use common::TestApp;

#[tokio::test]
async fn test_default_preferences() {
    let app = TestApp::new().await;

    let response = app.server().get("/api/preferences").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    assert_eq!(body["dark_mode"], false);
    assert_eq!(body["drawer_open"], false);
    assert_eq!(body["unit"], "bytes");
}

#[tokio::test]
async fn test_partial_update_persists() {
    let app = TestApp::new().await;

    let response = app
        .server()
        .put("/api/preferences")
        .json(&serde_json::json!({ "unit": "bits" }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["unit"], "bits");
    assert_eq!(body["dark_mode"], false);

    let path = app.state().preferences.path().to_path_buf();
    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(stored["unit"], "bits");
}

#[tokio::test]
async fn test_invalid_unit_rejected() {
    let app = TestApp::new().await;

    let response = app
        .server()
        .put("/api/preferences")
        .json(&serde_json::json!({ "unit": "nibbles" }))
        .await;

    assert!(response.status_code().is_client_error());
    let body: serde_json::Value = app.server().get("/api/preferences").await.json();
    assert_eq!(body["unit"], "bytes");
}
