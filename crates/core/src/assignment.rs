//! Variant assignment decision logic.
//!
//! The decision is a pure function of the existing cookie value, the
//! experiment config, and a uniform draw in `[0, 100)`. Persistence (the
//! cookie write) happens at the HTTP boundary, so this stays unit-testable
//! without any storage.

use rand::Rng;

use crate::types::{AbTestConfig, Variant};

/// Outcome of a variant decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub variant: Variant,
    /// True when this call made the assignment rather than echoing a cookie.
    pub newly_assigned: bool,
}

/// Decide the variant for a visitor.
///
/// An existing value always wins, so repeat calls are idempotent for the
/// cookie's lifetime. With the experiment disabled every new visitor lands
/// on A. Otherwise the boundary is half-open: `draw < split.a` assigns A,
/// so a split of 0 never assigns A and a split of 100 always does.
pub fn decide_variant(
    existing: Option<Variant>,
    config: &AbTestConfig,
    draw: f64,
) -> Assignment {
    if let Some(variant) = existing {
        return Assignment {
            variant,
            newly_assigned: false,
        };
    }

    if !config.enabled {
        return Assignment {
            variant: Variant::A,
            newly_assigned: true,
        };
    }

    let variant = if draw < config.traffic_split.a {
        Variant::A
    } else {
        Variant::B
    };

    Assignment {
        variant,
        newly_assigned: true,
    }
}

/// Uniform draw in `[0, 100)` for assignment.
pub fn draw_percentage() -> f64 {
    rand::thread_rng().gen_range(0.0..100.0)
}
