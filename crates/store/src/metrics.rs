//! Conversion-metric aggregation.
//!
//! Everything here is an O(n) scan over the event slice it is handed.
//! The store is in-memory and process-bound, so repeated full scans are
//! acceptable; an indexed reimplementation must preserve these filtering
//! semantics exactly.

use std::collections::HashSet;

use ab_core::{AnalyticsEvent, ConversionMetrics, EventType, Variant};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Metrics for both experiment arms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantMetrics {
    #[serde(rename = "A")]
    pub a: ConversionMetrics,
    #[serde(rename = "B")]
    pub b: ConversionMetrics,
}

impl VariantMetrics {
    pub fn for_variant(&self, variant: Variant) -> &ConversionMetrics {
        match variant {
            Variant::A => &self.a,
            Variant::B => &self.b,
        }
    }
}

fn count(events: &[AnalyticsEvent], event_type: EventType, variant: Variant) -> u64 {
    events
        .iter()
        .filter(|e| e.event_type == event_type && e.variant == variant)
        .count() as u64
}

fn metrics_for(events: &[AnalyticsEvent], variant: Variant) -> ConversionMetrics {
    let page_views = count(events, EventType::PageView, variant);
    let signups = count(events, EventType::SignupSuccess, variant);
    let conversion_rate = if page_views > 0 {
        (signups as f64 / page_views as f64) * 100.0
    } else {
        0.0
    };

    ConversionMetrics {
        variant,
        page_views,
        signups,
        conversion_rate,
        last_updated: Utc::now(),
    }
}

/// Compute per-variant conversion metrics over an already-filtered slice.
pub fn variant_metrics(events: &[AnalyticsEvent]) -> VariantMetrics {
    VariantMetrics {
        a: metrics_for(events, Variant::A),
        b: metrics_for(events, Variant::B),
    }
}

/// Cardinality of distinct session ids after variant/test filtering.
pub fn unique_sessions_count(
    events: &[AnalyticsEvent],
    variant: Option<Variant>,
    include_test: bool,
) -> usize {
    let sessions: HashSet<&str> = events
        .iter()
        .filter(|e| variant.map_or(true, |v| e.variant == v))
        .filter(|e| include_test || !e.is_test_session())
        .map(|e| e.session_id.as_str())
        .collect();
    sessions.len()
}
