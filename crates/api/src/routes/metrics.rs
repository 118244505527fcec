//! Conversion-metrics and data-reset handlers.

use ab_core::Variant;
use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use crate::cookies;
use crate::response::{
    ApiError, ClearResponse, MetricsResponse, MetricsSummary, SplitPercentages, VariantCounts,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MetricsQuery {
    pub include_test_sessions: Option<bool>,
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole > 0 {
        (part as f64 / whole as f64) * 100.0
    } else {
        0.0
    }
}

/// GET /api/analytics/metrics - per-variant metrics plus dashboard summary.
///
/// Everything here is recomputed from the raw event log on every call;
/// nothing is cached.
pub async fn get_metrics(
    State(state): State<AppState>,
    Query(query): Query<MetricsQuery>,
) -> Result<Json<MetricsResponse>, ApiError> {
    let include_test = query.include_test_sessions.unwrap_or(false);
    let store = &state.store;

    let metrics = store.conversion_metrics(include_test);

    let sessions_a = store.unique_sessions_count(Some(Variant::A), include_test);
    let sessions_b = store.unique_sessions_count(Some(Variant::B), include_test);
    let sessions_total = store.unique_sessions_count(None, include_test);

    let summary = MetricsSummary {
        total_events: store.events(include_test).len(),
        total_waitlist_entries: store.waitlist_entries(include_test).len(),
        unique_sessions: VariantCounts {
            a: sessions_a,
            b: sessions_b,
            total: sessions_total,
        },
        traffic_split: SplitPercentages {
            a: percentage(sessions_a, sessions_total),
            b: percentage(sessions_b, sessions_total),
        },
    };

    Ok(Json(MetricsResponse {
        metrics,
        summary,
        last_updated: Utc::now(),
    }))
}

/// DELETE /api/analytics/metrics - irreversible wipe of both collections.
/// Also expires the caller's visitor cookies, so the resetting client starts
/// over with a fresh session and assignment. Intended for test and
/// administrative resets only.
pub async fn clear_all(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<ClearResponse>) {
    let events = state.store.event_count();
    let entries = state.store.waitlist_count();
    state.store.clear_all();

    warn!(events, entries, "cleared all analytics data");
    info!("store reset complete");

    (
        cookies::clear_visitor_cookies(jar),
        Json(ClearResponse {
            success: true,
            message: "All data cleared".to_string(),
        }),
    )
}
