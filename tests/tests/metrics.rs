//! Dashboard metrics computed over API-seeded data.

use axum::http::StatusCode;
use integration_tests::{fixtures, setup::TestContext};
use serde_json::Value;

async fn seed_event(server: &axum_test::TestServer, payload: &Value) {
    server
        .post("/api/analytics")
        .json(payload)
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn conversion_rates_follow_the_event_log() {
    let ctx = TestContext::new();
    let server = ctx.server();

    // A: 4 views, 1 signup. B: 2 views, 1 signup.
    for i in 0..4 {
        seed_event(&server, &fixtures::event_payload("page_view", "A", &fixtures::session_id(i))).await;
    }
    seed_event(&server, &fixtures::event_payload("signup_success", "A", &fixtures::session_id(0))).await;
    for i in 10..12 {
        seed_event(&server, &fixtures::event_payload("page_view", "B", &fixtures::session_id(i))).await;
    }
    seed_event(&server, &fixtures::event_payload("signup_success", "B", &fixtures::session_id(10))).await;

    let response = server.get("/api/analytics/metrics").await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert_eq!(body["metrics"]["A"]["pageViews"], 4);
    assert_eq!(body["metrics"]["A"]["signups"], 1);
    assert_eq!(body["metrics"]["A"]["conversionRate"], 25.0);
    assert_eq!(body["metrics"]["B"]["pageViews"], 2);
    assert_eq!(body["metrics"]["B"]["conversionRate"], 50.0);

    assert_eq!(body["summary"]["totalEvents"], 7);
    assert_eq!(body["summary"]["uniqueSessions"]["A"], 4);
    assert_eq!(body["summary"]["uniqueSessions"]["B"], 2);
    assert_eq!(body["summary"]["uniqueSessions"]["total"], 6);
}

#[tokio::test]
async fn test_sessions_are_excluded_unless_requested() {
    let ctx = TestContext::new();
    let server = ctx.server();

    seed_event(&server, &fixtures::event_payload("page_view", "A", "1-real")).await;
    seed_event(&server, &fixtures::test_event_payload("page_view", "A", "1-test")).await;

    let response = server.get("/api/analytics/metrics").await;
    let body: Value = response.json();
    assert_eq!(body["metrics"]["A"]["pageViews"], 1);
    assert_eq!(body["summary"]["totalEvents"], 1);

    let response = server
        .get("/api/analytics/metrics")
        .add_query_param("include_test_sessions", "true")
        .await;
    let body: Value = response.json();
    assert_eq!(body["metrics"]["A"]["pageViews"], 2);
    assert_eq!(body["summary"]["totalEvents"], 2);
}

#[tokio::test]
async fn event_listing_supports_variant_and_type_filters() {
    let ctx = TestContext::new();
    let server = ctx.server();

    seed_event(&server, &fixtures::event_payload("page_view", "A", "1-s1")).await;
    seed_event(&server, &fixtures::event_payload("page_view", "B", "1-s2")).await;
    seed_event(&server, &fixtures::event_payload("button_click", "B", "1-s2")).await;

    let body: Value = server.get("/api/analytics").await.json();
    assert_eq!(body["events"].as_array().unwrap().len(), 3);

    let body: Value = server
        .get("/api/analytics")
        .add_query_param("variant", "B")
        .await
        .json();
    assert_eq!(body["events"].as_array().unwrap().len(), 2);

    let body: Value = server
        .get("/api/analytics")
        .add_query_param("type", "button_click")
        .await
        .json();
    assert_eq!(body["events"].as_array().unwrap().len(), 1);

    let body: Value = server
        .get("/api/analytics")
        .add_query_param("variant", "B")
        .add_query_param("type", "page_view")
        .await
        .json();
    assert_eq!(body["events"].as_array().unwrap().len(), 1);
    assert_eq!(body["events"][0]["sessionId"], "1-s2");
}

#[tokio::test]
async fn empty_store_reports_zeroed_metrics() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let body: Value = server.get("/api/analytics/metrics").await.json();
    assert_eq!(body["metrics"]["A"]["pageViews"], 0);
    assert_eq!(body["metrics"]["A"]["conversionRate"], 0.0);
    assert_eq!(body["summary"]["uniqueSessions"]["total"], 0);
    assert_eq!(body["summary"]["trafficSplit"]["A"], 0.0);
}

#[tokio::test]
async fn clear_all_wipes_both_collections_and_is_idempotent() {
    let ctx = TestContext::new();
    let server = ctx.server();

    seed_event(&server, &fixtures::event_payload("page_view", "A", "1-s1")).await;
    server
        .post("/api/waitlist")
        .json(&fixtures::waitlist_payload("wipe@example.com", "A"))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server.delete("/api/analytics/metrics").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);

    assert_eq!(ctx.store.event_count(), 0);
    assert_eq!(ctx.store.waitlist_count(), 0);

    // Clearing an already-empty store succeeds the same way.
    server.delete("/api/analytics/metrics").await.assert_status_ok();

    // The freed email can sign up again.
    server
        .post("/api/waitlist")
        .json(&fixtures::waitlist_payload("wipe@example.com", "A"))
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn clear_all_expires_the_visitor_cookies() {
    let ctx = TestContext::new();
    let server = ctx.browser();

    // Establish session and variant cookies.
    server.get("/").await.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(ctx.store.event_count(), 1);

    let response = server.delete("/api/analytics/metrics").await;
    response.assert_status_ok();
    assert_eq!(response.cookie("session_id").value(), "");
    assert_eq!(response.cookie("ab_test_variant").value(), "");
    assert_eq!(ctx.store.event_count(), 0);

    // With both cookies gone the next visit assigns from scratch.
    server.get("/").await.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(ctx.store.event_count(), 1);
}
