//! Application state shared across handlers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use ab_core::limits::{
    ANALYTICS_MAX_REQUESTS, RATE_SWEEP_SECS, RATE_WINDOW_SECS, WAITLIST_MAX_REQUESTS,
};
use ab_core::AbTestConfig;
use event_store::SharedStore;
use tracing::debug;

use crate::middleware::rate_limit::{RateLimitConfig, RateLimiter, SharedRateLimiter};

/// Shared application state.
///
/// Built once at the composition root; tests construct isolated instances
/// with their own store and limiter settings.
#[derive(Clone)]
pub struct AppState {
    /// Event and waitlist storage.
    pub store: SharedStore,
    /// Experiment configuration for new assignments.
    pub ab_config: AbTestConfig,
    /// Whether cookies carry the `Secure` attribute.
    pub secure_cookies: bool,
    /// Limiter for waitlist writes (5 / 15 min).
    pub waitlist_limiter: SharedRateLimiter,
    /// Limiter for analytics writes (20 / 15 min).
    pub analytics_limiter: SharedRateLimiter,
    /// Process start, for the health endpoint.
    pub started_at: Instant,
}

impl AppState {
    /// Production-shaped state: rate limiting and secure cookies follow the
    /// `production` flag.
    pub fn new(store: SharedStore, ab_config: AbTestConfig, production: bool) -> Self {
        let window = Duration::from_secs(RATE_WINDOW_SECS);
        Self::with_rate_limiters(
            store,
            ab_config,
            production,
            RateLimiter::new(RateLimitConfig::new(
                WAITLIST_MAX_REQUESTS,
                window,
                production,
            )),
            RateLimiter::new(RateLimitConfig::new(
                ANALYTICS_MAX_REQUESTS,
                window,
                production,
            )),
        )
    }

    /// State with caller-supplied limiters (used by tests to exercise the
    /// rate-limit path with small quotas).
    pub fn with_rate_limiters(
        store: SharedStore,
        ab_config: AbTestConfig,
        secure_cookies: bool,
        waitlist_limiter: RateLimiter,
        analytics_limiter: RateLimiter,
    ) -> Self {
        Self {
            store,
            ab_config,
            secure_cookies,
            waitlist_limiter: Arc::new(waitlist_limiter),
            analytics_limiter: Arc::new(analytics_limiter),
            started_at: Instant::now(),
        }
    }

    /// Start the periodic sweep of expired rate-limit entries.
    pub fn start_rate_limiter_sweep(&self) -> tokio::task::JoinHandle<()> {
        let waitlist = self.waitlist_limiter.clone();
        let analytics = self.analytics_limiter.clone();
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(RATE_SWEEP_SECS));
            loop {
                interval.tick().await;
                waitlist.cleanup();
                analytics.cleanup();
                debug!("swept expired rate-limit entries");
            }
        })
    }
}
