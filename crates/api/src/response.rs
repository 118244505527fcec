//! Standardized API responses.

use ab_core::{Variant, WaitlistEntry};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use event_store::VariantMetrics;
use serde::{Deserialize, Serialize};

/// Success response for event ingestion.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrackResponse {
    pub success: bool,
}

impl TrackResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Event listing for the admin events view.
#[derive(Debug, Serialize, Deserialize)]
pub struct EventsResponse {
    pub events: Vec<ab_core::AnalyticsEvent>,
}

/// Waitlist entry view returned to the signing-up visitor.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedEntry {
    pub id: String,
    pub email: String,
    pub variant: Variant,
    pub timestamp: DateTime<Utc>,
}

impl From<&WaitlistEntry> for JoinedEntry {
    fn from(entry: &WaitlistEntry) -> Self {
        Self {
            id: entry.id.clone(),
            email: entry.email.clone(),
            variant: entry.variant,
            timestamp: entry.timestamp,
        }
    }
}

/// Success response for a waitlist signup.
#[derive(Debug, Serialize, Deserialize)]
pub struct JoinResponse {
    pub success: bool,
    pub entry: JoinedEntry,
}

/// Privacy-sanitized waitlist entry: no email in list views.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicEntry {
    pub id: String,
    pub variant: Variant,
    pub timestamp: DateTime<Utc>,
}

impl From<&WaitlistEntry> for PublicEntry {
    fn from(entry: &WaitlistEntry) -> Self {
        Self {
            id: entry.id.clone(),
            variant: entry.variant,
            timestamp: entry.timestamp,
        }
    }
}

/// Public waitlist listing.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistListResponse {
    pub entries: Vec<PublicEntry>,
    pub count: usize,
    pub total_count: usize,
}

/// Admin waitlist listing, full entries plus per-variant stats.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminWaitlistResponse {
    pub entries: Vec<WaitlistEntry>,
    pub count: usize,
    pub total_count: usize,
    pub stats: VariantCounts,
}

/// Unique session counts per variant plus the overall total.
#[derive(Debug, Serialize, Deserialize)]
pub struct VariantCounts {
    #[serde(rename = "A")]
    pub a: usize,
    #[serde(rename = "B")]
    pub b: usize,
    pub total: usize,
}

/// Observed traffic split, derived from unique sessions.
#[derive(Debug, Serialize, Deserialize)]
pub struct SplitPercentages {
    #[serde(rename = "A")]
    pub a: f64,
    #[serde(rename = "B")]
    pub b: f64,
}

/// Dashboard summary block.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub total_events: usize,
    pub total_waitlist_entries: usize,
    pub unique_sessions: VariantCounts,
    pub traffic_split: SplitPercentages,
}

/// Full metrics payload for the dashboard.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    pub metrics: VariantMetrics,
    pub summary: MetricsSummary,
    pub last_updated: DateTime<Utc>,
}

/// Response to the clear-all wipe.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClearResponse {
    pub success: bool,
    pub message: String,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub events_stored: usize,
    pub waitlist_entries: usize,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

/// API error with status and optional rate-limit headers.
pub struct ApiError {
    pub status: StatusCode,
    pub response: ErrorResponse,
    pub retry_after: Option<u64>,
    pub quota: Option<QuotaHeaders>,
}

/// Rate-limit header values attached to throttled (and successful write)
/// responses.
#[derive(Debug, Clone)]
pub struct QuotaHeaders {
    pub limit: u32,
    pub remaining: u32,
    pub reset_epoch_millis: i64,
}

impl ApiError {
    pub fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            response: ErrorResponse {
                error: msg.into(),
                retry_after: None,
            },
            retry_after: None,
            quota: None,
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, msg)
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, msg)
    }

    pub fn rate_limited(retry_after: u64, quota: QuotaHeaders) -> Self {
        Self {
            status: StatusCode::TOO_MANY_REQUESTS,
            response: ErrorResponse {
                error: "Too many requests. Please try again later.".to_string(),
                retry_after: Some(retry_after),
            },
            retry_after: Some(retry_after),
            quota: Some(quota),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.response)).into_response();

        if let Some(retry_after) = self.retry_after {
            if let Ok(value) = retry_after.to_string().parse() {
                response.headers_mut().insert("Retry-After", value);
            }
        }

        if let Some(quota) = self.quota {
            let headers = response.headers_mut();
            if let Ok(v) = quota.limit.to_string().parse() {
                headers.insert("X-RateLimit-Limit", v);
            }
            if let Ok(v) = quota.remaining.to_string().parse() {
                headers.insert("X-RateLimit-Remaining", v);
            }
            if let Ok(v) = quota.reset_epoch_millis.to_string().parse() {
                headers.insert("X-RateLimit-Reset", v);
            }
        }

        response
    }
}

impl From<ab_core::Error> for ApiError {
    fn from(err: ab_core::Error) -> Self {
        // The duplicate-email rejection is worded for end users; everything
        // else surfaces the domain error's own message under its status.
        if matches!(err, ab_core::Error::DuplicateEmail) {
            return ApiError::conflict(
                "Good news! You're already on our waitlist. \
                 We'll notify you as soon as we launch!",
            );
        }

        let status = StatusCode::from_u16(err.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        ApiError::new(status, err.to_string())
    }
}
