//! Health and probe endpoints.

use axum::http::StatusCode;
use integration_tests::{fixtures, setup::TestContext};

#[tokio::test]
async fn health_reports_store_counts() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["eventsStored"], 0);
    assert_eq!(body["waitlistEntries"], 0);

    server
        .post("/api/analytics")
        .json(&fixtures::event_payload("page_view", "A", "1-s1"))
        .await
        .assert_status(StatusCode::CREATED);

    let body: serde_json::Value = server.get("/health").await.json();
    assert_eq!(body["eventsStored"], 1);
}

#[tokio::test]
async fn probes_answer_ok() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server.get("/health/ready").await.assert_status_ok();
    server.get("/health/live").await.assert_status_ok();
}

#[tokio::test]
async fn unknown_routes_return_404() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server.get("/api/unknown").await.assert_status(StatusCode::NOT_FOUND);
}
