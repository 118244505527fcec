//! Size limits and fixed policy constants for the gateway.
//!
//! Field limits mirror what the original marketing site enforced; rate-limit
//! quotas are deliberately tight because both guarded endpoints are
//! write-only and driven by a single page of frontend code.

// === Payload Limits ===

/// Maximum serialized payload for ingestion endpoints (KB).
pub const MAX_PAYLOAD_KB: usize = 5;

// === String Field Limits (chars) ===

/// Email address bounds per RFC 5321 total-length cap.
pub const MAX_EMAIL_LEN: usize = 254;
pub const MIN_EMAIL_LEN: usize = 3;

/// User agent string max length.
/// Browser UAs: 100-300 typical, 500 with extensions.
pub const MAX_USER_AGENT_LEN: usize = 500;

/// Referrer URL max length. Matches HTTP Referer header limit.
pub const MAX_REFERRER_LEN: usize = 2048;

// === Cookie Lifetimes ===

/// Session and variant cookies persist for 30 days.
pub const PERSISTENT_COOKIE_DAYS: i64 = 30;

/// Test-session marker cookie persists for 1 day.
pub const TEST_COOKIE_DAYS: i64 = 1;

// === Rate Limiting ===

/// Waitlist writes per window per client.
pub const WAITLIST_MAX_REQUESTS: u32 = 5;

/// Analytics writes per window per client.
pub const ANALYTICS_MAX_REQUESTS: u32 = 20;

/// Fixed window length (15 minutes).
pub const RATE_WINDOW_SECS: u64 = 15 * 60;

/// Interval between sweeps of expired rate-limit entries (5 minutes).
pub const RATE_SWEEP_SECS: u64 = 5 * 60;

// === Identifiers ===

/// Length of the random base-36 suffix on generated ids.
pub const ID_SUFFIX_LEN: usize = 9;
