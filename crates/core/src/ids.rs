//! Identifier generation.
//!
//! All ids share the shape `<epoch-millis>` plus a short random base-36
//! suffix. Collision probability is accepted as negligible for a store that
//! lives only as long as the process.

use chrono::Utc;
use rand::Rng;

use crate::limits::ID_SUFFIX_LEN;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

fn base36_suffix() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

/// Stable visitor identifier: `<millis>-<suffix>`.
pub fn session_id() -> String {
    format!("{}-{}", Utc::now().timestamp_millis(), base36_suffix())
}

/// Analytics event id: `evt_<millis>_<suffix>`.
pub fn event_id() -> String {
    format!("evt_{}_{}", Utc::now().timestamp_millis(), base36_suffix())
}

/// Waitlist entry id: `wl_<millis>_<suffix>`.
pub fn waitlist_id() -> String {
    format!("wl_{}_{}", Utc::now().timestamp_millis(), base36_suffix())
}
