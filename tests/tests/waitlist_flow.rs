//! Waitlist signup flow and the two listing views.

use axum::http::StatusCode;
use integration_tests::{fixtures, setup::TestContext};

#[tokio::test]
async fn signup_returns_the_created_entry() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/waitlist")
        .json(&fixtures::waitlist_payload("alice@example.com", "B"))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["entry"]["email"], "alice@example.com");
    assert_eq!(body["entry"]["variant"], "B");
    assert!(body["entry"]["id"].as_str().unwrap().starts_with("wl_"));

    assert_eq!(ctx.store.waitlist_count(), 1);
}

#[tokio::test]
async fn email_is_stored_sanitized() {
    let ctx = TestContext::new();
    let server = ctx.server();

    let response = server
        .post("/api/waitlist")
        .json(&fixtures::waitlist_payload("  bob@example.com  ", "A"))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["entry"]["email"], "bob@example.com");
}

#[tokio::test]
async fn public_listing_never_exposes_emails() {
    let ctx = TestContext::new();
    let server = ctx.server();

    for (email, variant) in [
        ("one@example.com", "A"),
        ("two@example.com", "B"),
        ("three@example.com", "B"),
    ] {
        server
            .post("/api/waitlist")
            .json(&fixtures::waitlist_payload(email, variant))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = server.get("/api/waitlist").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["count"], 3);
    assert_eq!(body["totalCount"], 3);
    for entry in body["entries"].as_array().unwrap() {
        assert!(entry.get("email").is_none(), "email leaked: {entry}");
        assert!(entry.get("id").is_some());
    }

    // Variant filter narrows count but keeps the overall total.
    let response = server
        .get("/api/waitlist")
        .add_query_param("variant", "B")
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["count"], 2);
    assert_eq!(body["totalCount"], 3);
}

#[tokio::test]
async fn admin_listing_has_full_entries_newest_first() {
    let ctx = TestContext::new();
    let server = ctx.server();

    for email in ["first@example.com", "second@example.com"] {
        server
            .post("/api/waitlist")
            .json(&fixtures::waitlist_payload(email, "A"))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = server.get("/api/admin/waitlist").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    assert_eq!(body["count"], 2);
    assert_eq!(body["stats"]["A"], 2);
    assert_eq!(body["stats"]["B"], 0);
    assert_eq!(body["stats"]["total"], 2);

    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries[0]["email"], "second@example.com");
    assert_eq!(entries[1]["email"], "first@example.com");
}

#[tokio::test]
async fn admin_listing_rejects_unknown_export_formats() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server
        .get("/api/admin/waitlist")
        .add_query_param("format", "json")
        .await
        .assert_status_ok();

    server
        .get("/api/admin/waitlist")
        .add_query_param("format", "csv")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn signups_from_test_sessions_are_excluded_from_listings() {
    let ctx = TestContext::new();
    let server = ctx.browser();

    // Direct access marks the browser as a test session.
    server
        .get("/landing-a")
        .add_query_param("direct_access", "1")
        .await
        .assert_status_ok();

    server
        .post("/api/waitlist")
        .json(&fixtures::waitlist_payload("tester@example.com", "A"))
        .await
        .assert_status(StatusCode::CREATED);

    assert_eq!(ctx.store.waitlist_entries(false).len(), 0);
    assert_eq!(ctx.store.waitlist_entries(true).len(), 1);
}
