//! Routing-consistency guard: the variant cookie is authoritative for the
//! landing routes, except under explicit direct access.

use axum::http::StatusCode;
use cookie::Cookie;
use integration_tests::setup::TestContext;

#[tokio::test]
async fn mismatched_cookie_redirects_to_the_assigned_page() {
    let ctx = TestContext::new();
    let mut server = ctx.server();
    server.add_cookie(Cookie::new("ab_test_variant", "B"));

    let response = server.get("/landing-a").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location").to_str().unwrap(), "/landing-b");
}

#[tokio::test]
async fn matching_cookie_serves_the_page() {
    let ctx = TestContext::new();
    let mut server = ctx.server();
    server.add_cookie(Cookie::new("ab_test_variant", "A"));

    let response = server.get("/landing-a").await;
    response.assert_status_ok();
    assert!(response.text().contains("data-variant=\"A\""));
}

#[tokio::test]
async fn no_cookie_serves_either_page_directly() {
    let ctx = TestContext::new();
    let server = ctx.server();

    ctx.server().get("/landing-a").await.assert_status_ok();
    server.get("/landing-b").await.assert_status_ok();
}

#[tokio::test]
async fn malformed_cookie_is_ignored() {
    let ctx = TestContext::new();
    let mut server = ctx.server();
    server.add_cookie(Cookie::new("ab_test_variant", "purple"));

    let response = server.get("/landing-b").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn direct_access_bypasses_the_guard_and_marks_the_session() {
    let ctx = TestContext::new();
    let mut server = ctx.browser();
    server.add_cookie(Cookie::new("ab_test_variant", "B"));

    let response = server.get("/landing-a").add_query_param("direct_access", "1").await;
    response.assert_status_ok();
    assert!(response.text().contains("data-variant=\"A\""));
    assert_eq!(response.cookie("test_session").value(), "1");
}

#[tokio::test]
async fn events_after_direct_access_are_flagged_as_test_traffic() {
    let ctx = TestContext::new();
    let server = ctx.browser();

    server
        .get("/landing-b")
        .add_query_param("direct_access", "1")
        .await
        .assert_status_ok();

    // The saved test_session cookie rides along with this event.
    let response = server
        .post("/api/analytics")
        .json(&integration_tests::fixtures::event_payload(
            "page_view",
            "B",
            "1700000000000-directxyz",
        ))
        .await;
    response.assert_status(StatusCode::CREATED);

    assert_eq!(ctx.store.events(false).len(), 0);
    assert_eq!(ctx.store.events(true).len(), 1);
    assert!(ctx.store.events(true)[0].is_test_session());
}
