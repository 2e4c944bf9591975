mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn health_reports_database_status() {
    let (app, _db) = common::test_app().await;

    let (status, body) = common::get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
    assert!(body["version"].is_string());
}
