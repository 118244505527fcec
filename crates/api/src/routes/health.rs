//! Health check endpoints.

use axum::{extract::State, http::StatusCode, Json};

use crate::response::HealthResponse;
use crate::state::AppState;

/// GET /health - Full health check with store counts.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        events_stored: state.store.event_count(),
        waitlist_entries: state.store.waitlist_count(),
    })
}

/// GET /health/ready - Readiness probe. The store is in-process memory, so
/// the service is ready as soon as it can answer at all.
pub async fn ready_handler() -> StatusCode {
    StatusCode::OK
}

/// GET /health/live - Liveness probe.
pub async fn live_handler() -> StatusCode {
    StatusCode::OK
}
