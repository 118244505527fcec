//! Waitlist signup and listing handlers.

use ab_core::{ids, validation, EventMetadata, WaitlistEntry};
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
use tracing::info;

use crate::cookies;
use crate::extractors::ClientIp;
use crate::response::{
    AdminWaitlistResponse, ApiError, JoinResponse, PublicEntry, VariantCounts,
    WaitlistListResponse,
};
use crate::routes::{check_rate_limit, quota_headers};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    pub email: Option<String>,
    pub variant: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

/// POST /api/waitlist - add a visitor to the waitlist.
pub async fn join(
    State(state): State<AppState>,
    ClientIp(client): ClientIp,
    jar: CookieJar,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    check_rate_limit(&state.waitlist_limiter, &client)?;
    validation::validate_ingestion_payload(&body)?;

    let request: JoinRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("Invalid JSON payload: {e}")))?;

    let email = validation::validate_email(request.email.as_deref().unwrap_or_default())?;
    let variant = match request.variant.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(raw) => validation::validate_variant(raw)?,
        None => return Err(ab_core::Error::MissingField("variant").into()),
    };

    // Stamp the session link and test flag at write time; exclusion still
    // honors the event log as the authority (see waitlist_entries).
    let metadata = EventMetadata {
        is_test_session: cookies::is_test_session(&jar),
        session_id: cookies::session_id(&jar),
        extra: Default::default(),
    };

    let entry = WaitlistEntry {
        id: ids::waitlist_id(),
        email,
        variant,
        timestamp: Utc::now(),
        user_agent: request
            .user_agent
            .as_deref()
            .map(validation::sanitize_user_agent)
            .filter(|s| !s.is_empty()),
        referrer: request
            .referrer
            .as_deref()
            .map(validation::sanitize_referrer)
            .filter(|s| !s.is_empty()),
        metadata: Some(metadata),
    };

    let joined = (&entry).into();
    state.store.store_waitlist_entry(entry)?;

    info!(variant = %variant, "waitlist signup stored");
    Ok((
        StatusCode::CREATED,
        quota_headers(&state.waitlist_limiter, &client),
        Json(JoinResponse {
            success: true,
            entry: joined,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub variant: Option<String>,
}

/// GET /api/waitlist - privacy-sanitized listing (no emails).
pub async fn list_public(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<WaitlistListResponse>, ApiError> {
    let all = state.store.waitlist_entries(false);
    let total_count = all.len();

    let entries: Vec<PublicEntry> = match query.variant.as_deref() {
        Some(raw) => {
            let variant = validation::validate_variant(raw)?;
            all.iter()
                .filter(|e| e.variant == variant)
                .map(PublicEntry::from)
                .collect()
        }
        None => all.iter().map(PublicEntry::from).collect(),
    };

    let count = entries.len();
    Ok(Json(WaitlistListResponse {
        entries,
        count,
        total_count,
    }))
}

#[derive(Debug, Deserialize)]
pub struct AdminQuery {
    pub variant: Option<String>,
    pub format: Option<String>,
}

/// GET /api/admin/waitlist - full entries for the admin dashboard,
/// newest first.
pub async fn list_admin(
    State(state): State<AppState>,
    Query(query): Query<AdminQuery>,
) -> Result<Json<AdminWaitlistResponse>, ApiError> {
    if let Some(format) = query.format.as_deref() {
        if !format.eq_ignore_ascii_case("json") {
            return Err(ApiError::bad_request(format!(
                "unsupported export format: {format}"
            )));
        }
    }

    let all = state.store.waitlist_entries(false);
    let total_count = all.len();

    let a = all.iter().filter(|e| e.variant == ab_core::Variant::A).count();
    let b = total_count - a;

    let mut entries: Vec<WaitlistEntry> = match query.variant.as_deref() {
        Some(raw) => {
            let variant = validation::validate_variant(raw)?;
            all.into_iter().filter(|e| e.variant == variant).collect()
        }
        None => all,
    };
    entries.sort_by(|x, y| y.timestamp.cmp(&x.timestamp));

    let count = entries.len();
    Ok(Json(AdminWaitlistResponse {
        entries,
        count,
        total_count,
        stats: VariantCounts {
            a,
            b,
            total: total_count,
        },
    }))
}
