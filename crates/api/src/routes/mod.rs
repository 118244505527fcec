//! API routes.

pub mod analytics;
pub mod health;
pub mod metrics;
pub mod pages;
pub mod waitlist;

use axum::{
    response::AppendHeaders,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::middleware::rate_limit::RateLimiter;
use crate::response::{ApiError, QuotaHeaders};
use crate::state::AppState;

/// Creates the gateway router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(pages::assign_and_redirect))
        .route("/landing-a", get(pages::landing_a))
        .route("/landing-b", get(pages::landing_b))
        .route(
            "/api/analytics",
            post(analytics::submit_event).get(analytics::list_events),
        )
        .route(
            "/api/analytics/metrics",
            get(metrics::get_metrics).delete(metrics::clear_all),
        )
        .route(
            "/api/waitlist",
            post(waitlist::join).get(waitlist::list_public),
        )
        .route("/api/admin/waitlist", get(waitlist::list_admin))
        .route("/health", get(health::health_handler))
        .route("/health/ready", get(health::ready_handler))
        .route("/health/live", get(health::live_handler))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Reject over-quota clients with retry and quota headers.
pub(crate) fn check_rate_limit(limiter: &RateLimiter, client: &str) -> Result<(), ApiError> {
    if limiter.is_rate_limited(client) {
        warn!(client = %client, "rate limit exceeded");
        return Err(ApiError::rate_limited(
            limiter.retry_after_secs(client),
            QuotaHeaders {
                limit: limiter.max_requests(),
                remaining: limiter.remaining_requests(client),
                reset_epoch_millis: limiter.reset_epoch_millis(client),
            },
        ));
    }
    Ok(())
}

/// Quota headers attached to successful write responses.
pub(crate) fn quota_headers(
    limiter: &RateLimiter,
    client: &str,
) -> AppendHeaders<[(&'static str, String); 3]> {
    AppendHeaders([
        ("X-RateLimit-Limit", limiter.max_requests().to_string()),
        (
            "X-RateLimit-Remaining",
            limiter.remaining_requests(client).to_string(),
        ),
        (
            "X-RateLimit-Reset",
            limiter.reset_epoch_millis(client).to_string(),
        ),
    ])
}
