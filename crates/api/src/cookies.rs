//! Cookie names and attribute policy.
//!
//! The browser holds the only durable copy of visitor state: a stable
//! session id and the assigned variant, both for 30 days, plus a short-lived
//! test-session marker set by the routing guard. All cookies are `Path=/`,
//! `SameSite=Strict`, and `Secure` in production.

use ab_core::limits::{PERSISTENT_COOKIE_DAYS, TEST_COOKIE_DAYS};
use ab_core::Variant;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Stable visitor identifier.
pub const SESSION_COOKIE: &str = "session_id";
/// Assigned experiment arm, `A` or `B`.
pub const VARIANT_COOKIE: &str = "ab_test_variant";
/// Marks direct-access/test traffic.
pub const TEST_SESSION_COOKIE: &str = "test_session";

fn build(name: &'static str, value: String, days: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(Duration::days(days))
        .build()
}

/// 30-day cookie for session id or variant.
pub fn persistent_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    build(name, value, PERSISTENT_COOKIE_DAYS, secure)
}

/// 1-day marker cookie for direct-access traffic.
pub fn test_session_cookie(secure: bool) -> Cookie<'static> {
    build(TEST_SESSION_COOKIE, "1".to_string(), TEST_COOKIE_DAYS, secure)
}

/// Read the session id, if any.
pub fn session_id(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Read the assigned variant. A malformed value (neither `A` nor `B`) is
/// treated as absent and will trigger fresh assignment upstream.
pub fn variant(jar: &CookieJar) -> Option<Variant> {
    jar.get(VARIANT_COOKIE)
        .and_then(|c| c.value().parse().ok())
}

/// Whether this visitor is marked as a test session.
pub fn is_test_session(jar: &CookieJar) -> bool {
    jar.get(TEST_SESSION_COOKIE).is_some()
}

/// Emit removal cookies for all visitor state. The removal path must match
/// the write path or browsers keep the originals.
pub fn clear_visitor_cookies(mut jar: CookieJar) -> CookieJar {
    for name in [SESSION_COOKIE, VARIANT_COOKIE, TEST_SESSION_COOKIE] {
        jar = jar.remove(Cookie::build(name).path("/").build());
    }
    jar
}
