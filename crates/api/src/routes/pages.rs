//! Landing-page routing: assignment redirect and the consistency guard.
//!
//! The page markup itself belongs to the frontend; these handlers only
//! enforce that a visitor assigned variant X keeps seeing X, and emit
//! minimal placeholder bodies where a page is served directly.

use ab_core::{
    assignment::{decide_variant, draw_percentage},
    ids, AnalyticsEvent, EventMetadata, EventType, Variant,
};
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::cookies;
use crate::state::AppState;

/// Guard decision for a landing-page request. Runs once per navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// First visit or already on the assigned route.
    Serve,
    /// Direct access requested: serve unmodified, mark as test session.
    ServeAsTest,
    /// Cookie disagrees with the URL; the cookie is authoritative.
    Redirect(Variant),
}

/// Pure routing-consistency check.
pub fn guard(requested: Variant, cookie: Option<Variant>, direct_access: bool) -> GuardOutcome {
    if direct_access {
        return GuardOutcome::ServeAsTest;
    }
    match cookie {
        Some(assigned) if assigned != requested => GuardOutcome::Redirect(assigned),
        _ => GuardOutcome::Serve,
    }
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// Presence alone marks the request; the value is ignored.
    pub direct_access: Option<String>,
}

const LANDING_A_BODY: &str = "<!doctype html>\
<html><head><title>Splitpage</title></head>\
<body data-variant=\"A\"><h1>Automate your marketing</h1></body></html>";

const LANDING_B_BODY: &str = "<!doctype html>\
<html><head><title>Splitpage</title></head>\
<body data-variant=\"B\"><h1>Your AI marketing team</h1></body></html>";

fn landing_body(variant: Variant) -> Html<&'static str> {
    match variant {
        Variant::A => Html(LANDING_A_BODY),
        Variant::B => Html(LANDING_B_BODY),
    }
}

/// GET / - assign (or recall) the visitor's variant and redirect to it.
///
/// Session id and variant are created at most once per visitor; repeat
/// visits pass through with both cookies untouched.
pub async fn assign_and_redirect(
    State(state): State<AppState>,
    mut jar: CookieJar,
) -> (CookieJar, Redirect) {
    let session_id = match cookies::session_id(&jar) {
        Some(existing) => existing,
        None => {
            let fresh = ids::session_id();
            jar = jar.add(cookies::persistent_cookie(
                cookies::SESSION_COOKIE,
                fresh.clone(),
                state.secure_cookies,
            ));
            fresh
        }
    };

    let assignment = decide_variant(cookies::variant(&jar), &state.ab_config, draw_percentage());

    if assignment.newly_assigned {
        jar = jar.add(cookies::persistent_cookie(
            cookies::VARIANT_COOKIE,
            assignment.variant.to_string(),
            state.secure_cookies,
        ));

        let mut metadata = EventMetadata {
            is_test_session: cookies::is_test_session(&jar),
            ..Default::default()
        };
        metadata.extra.insert(
            "assignment".to_string(),
            serde_json::Value::String("ab_test_redirect".to_string()),
        );

        state.store.store_event(AnalyticsEvent {
            id: ids::event_id(),
            event_type: EventType::AbTestAssignment,
            variant: assignment.variant,
            timestamp: Utc::now(),
            session_id: session_id.clone(),
            user_agent: None,
            referrer: None,
            metadata: Some(metadata),
        });

        info!(variant = %assignment.variant, "assigned new visitor");
    }

    (jar, Redirect::to(assignment.variant.landing_path()))
}

async fn landing(
    state: AppState,
    jar: CookieJar,
    query: PageQuery,
    requested: Variant,
) -> Response {
    match guard(
        requested,
        cookies::variant(&jar),
        query.direct_access.is_some(),
    ) {
        GuardOutcome::ServeAsTest => {
            info!(route = requested.landing_path(), "serving direct-access test session");
            let jar = jar.add(cookies::test_session_cookie(state.secure_cookies));
            (jar, landing_body(requested)).into_response()
        }
        GuardOutcome::Redirect(assigned) => {
            info!(
                requested = requested.landing_path(),
                assigned = assigned.landing_path(),
                "redirecting to assigned variant"
            );
            Redirect::to(assigned.landing_path()).into_response()
        }
        GuardOutcome::Serve => landing_body(requested).into_response(),
    }
}

/// GET /landing-a
pub async fn landing_a(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<PageQuery>,
) -> Response {
    landing(state, jar, query, Variant::A).await
}

/// GET /landing-b
pub async fn landing_b(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<PageQuery>,
) -> Response {
    landing(state, jar, query, Variant::B).await
}
