//! Domain type definitions for the Splitpage gateway.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One arm of the landing-page experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    A,
    B,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }

    /// The landing route this variant is served from.
    pub fn landing_path(&self) -> &'static str {
        match self {
            Self::A => "/landing-a",
            Self::B => "/landing-b",
        }
    }

    pub fn other(&self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            _ => Err(Error::InvalidVariant),
        }
    }
}

/// Typed analytics event names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    PageView,
    SignupAttempt,
    SignupSuccess,
    ButtonClick,
    AbTestAssignment,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PageView => "page_view",
            Self::SignupAttempt => "signup_attempt",
            Self::SignupSuccess => "signup_success",
            Self::ButtonClick => "button_click",
            Self::AbTestAssignment => "ab_test_assignment",
        }
    }
}

impl FromStr for EventType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "page_view" => Ok(Self::PageView),
            "signup_attempt" => Ok(Self::SignupAttempt),
            "signup_success" => Ok(Self::SignupSuccess),
            "button_click" => Ok(Self::ButtonClick),
            "ab_test_assignment" => Ok(Self::AbTestAssignment),
            other => Err(Error::validation(format!("unknown event type: {other}"))),
        }
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Client metadata attached to events and waitlist entries.
///
/// The frontend sends a free-form object here; the two fields the server
/// cares about are typed, everything else rides along in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetadata {
    /// Marks synthetic/direct-access traffic. Excludable from aggregations.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_test_session: bool,
    /// Links a waitlist entry back to the session that produced it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Anything else the tracking client included (url, buttonId, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A single analytics event. Append-only; never mutated after storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    /// Unique event id, `evt_<millis>_<base36>`.
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub variant: Variant,
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<EventMetadata>,
}

impl AnalyticsEvent {
    /// Whether this event is flagged as test traffic.
    pub fn is_test_session(&self) -> bool {
        self.metadata
            .as_ref()
            .map(|m| m.is_test_session)
            .unwrap_or(false)
    }
}

/// A waitlist signup. `email` is the store's only uniqueness key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntry {
    /// Unique entry id, `wl_<millis>_<base36>`.
    pub id: String,
    pub email: String,
    pub variant: Variant,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<EventMetadata>,
}

impl WaitlistEntry {
    /// Session id linking this entry back to the event log, if recorded.
    pub fn session_id(&self) -> Option<&str> {
        self.metadata.as_ref()?.session_id.as_deref()
    }

    /// Test-session flag stamped at signup time.
    pub fn is_test_session(&self) -> bool {
        self.metadata
            .as_ref()
            .map(|m| m.is_test_session)
            .unwrap_or(false)
    }
}

/// Derived per-variant conversion statistics. Recomputed on every read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionMetrics {
    pub variant: Variant,
    pub page_views: u64,
    pub signups: u64,
    /// Percentage: 100 * signups / pageViews, 0 when there are no views.
    pub conversion_rate: f64,
    pub last_updated: DateTime<Utc>,
}

/// Traffic split percentages. Only `a`'s threshold matters for assignment;
/// the pair need not sum to exactly 100.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrafficSplit {
    #[serde(default = "default_split")]
    pub a: f64,
    #[serde(default = "default_split")]
    pub b: f64,
}

fn default_split() -> f64 {
    50.0
}

impl Default for TrafficSplit {
    fn default() -> Self {
        Self { a: 50.0, b: 50.0 }
    }
}

/// Experiment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbTestConfig {
    /// When false every visitor is assigned variant A.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub traffic_split: TrafficSplit,
}

fn default_enabled() -> bool {
    true
}

impl Default for AbTestConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            traffic_split: TrafficSplit::default(),
        }
    }
}
