//! Analytics ingestion and query handlers.

use ab_core::{
    ids, validation, AnalyticsEvent, Error, EventMetadata, EventType, Variant,
};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info};

use crate::cookies;
use crate::extractors::ClientIp;
use crate::response::{ApiError, EventsResponse, TrackResponse};
use crate::routes::{check_rate_limit, quota_headers};
use crate::state::AppState;

/// Incoming event payload. Required fields arrive as options so each
/// absence gets its own rejection reason instead of a generic parse error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackEventRequest {
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub variant: Option<String>,
    pub session_id: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub metadata: Option<EventMetadata>,
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, Error> {
    value
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or(Error::MissingField(field))
}

fn optional_sanitized(value: Option<&str>, sanitizer: fn(&str) -> String) -> Option<String> {
    value.map(sanitizer).filter(|s| !s.is_empty())
}

/// POST /api/analytics - store one analytics event.
pub async fn submit_event(
    State(state): State<AppState>,
    ClientIp(client): ClientIp,
    jar: CookieJar,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    check_rate_limit(&state.analytics_limiter, &client)?;
    validation::validate_ingestion_payload(&body)?;

    let request: TrackEventRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("Invalid JSON payload: {e}")))?;

    let event_type: EventType = required(&request.event_type, "type")?.parse()?;
    let variant = validation::validate_variant(required(&request.variant, "variant")?)?;
    let session_id = required(&request.session_id, "sessionId")?.to_string();

    // A test_session cookie overrides whatever the client claimed, so
    // direct-access traffic can never pollute the default metrics view.
    let mut metadata = request.metadata;
    if cookies::is_test_session(&jar) {
        metadata.get_or_insert_with(EventMetadata::default).is_test_session = true;
    }

    let event = AnalyticsEvent {
        id: ids::event_id(),
        event_type,
        variant,
        timestamp: Utc::now(),
        session_id,
        user_agent: optional_sanitized(
            request.user_agent.as_deref(),
            validation::sanitize_user_agent,
        ),
        referrer: optional_sanitized(request.referrer.as_deref(), validation::sanitize_referrer),
        metadata,
    };

    debug!(
        event_type = event.event_type.as_str(),
        variant = %event.variant,
        session = %event.session_id,
        "storing analytics event"
    );
    state.store.store_event(event);

    Ok((
        StatusCode::CREATED,
        quota_headers(&state.analytics_limiter, &client),
        Json(TrackResponse::ok()),
    ))
}

/// Query filters for the events listing.
#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub variant: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub include_test_sessions: Option<bool>,
}

/// GET /api/analytics - list events with optional filters.
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventsQuery>,
) -> Result<Json<EventsResponse>, ApiError> {
    let include_test = query.include_test_sessions.unwrap_or(false);

    let variant: Option<Variant> = match query.variant.as_deref() {
        Some(raw) => Some(validation::validate_variant(raw)?),
        None => None,
    };
    let event_type: Option<EventType> = match query.event_type.as_deref() {
        Some(raw) => Some(raw.parse()?),
        None => None,
    };

    let events = match (variant, event_type) {
        (Some(v), Some(t)) => state
            .store
            .events(include_test)
            .into_iter()
            .filter(|e| e.variant == v && e.event_type == t)
            .collect(),
        (Some(v), None) => state.store.events_by_variant(v, include_test),
        (None, Some(t)) => state.store.events_by_type(t, include_test),
        (None, None) => state.store.events(include_test),
    };

    info!(count = events.len(), "listed analytics events");
    Ok(Json(EventsResponse { events }))
}
