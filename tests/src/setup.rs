//! Common test setup functions.

use std::sync::Arc;
use std::time::Duration;

use ab_core::{AbTestConfig, TrafficSplit};
use api::middleware::rate_limit::{RateLimitConfig, RateLimiter};
use api::{router, AppState};
use axum::Router;
use axum_test::TestServer;
use event_store::{EventStore, SharedStore};

/// Test context with an isolated in-memory store behind the real router.
///
/// Every context gets its own store and limiters, so tests never share
/// state and can run in parallel.
pub struct TestContext {
    pub store: SharedStore,
    pub router: Router,
}

impl TestContext {
    /// Default context: rate limiting disabled, 50/50 split, plain cookies.
    pub fn new() -> Self {
        Self::with_config(AbTestConfig::default())
    }

    /// Context with a specific experiment configuration. Tests that need a
    /// deterministic variant force the split to 100/0 or 0/100.
    pub fn with_config(ab_config: AbTestConfig) -> Self {
        let store: SharedStore = Arc::new(EventStore::new());
        let window = Duration::from_secs(900);
        let state = AppState::with_rate_limiters(
            store.clone(),
            ab_config,
            false,
            RateLimiter::new(RateLimitConfig::new(5, window, false)),
            RateLimiter::new(RateLimitConfig::new(20, window, false)),
        );
        Self {
            store: store.clone(),
            router: router(state),
        }
    }

    /// Context with rate limiting enabled and small quotas, so the throttle
    /// path can be exercised without dozens of requests.
    pub fn with_rate_limits(waitlist_max: u32, analytics_max: u32) -> Self {
        let store: SharedStore = Arc::new(EventStore::new());
        let window = Duration::from_secs(900);
        let state = AppState::with_rate_limiters(
            store.clone(),
            AbTestConfig::default(),
            false,
            RateLimiter::new(RateLimitConfig::new(waitlist_max, window, true)),
            RateLimiter::new(RateLimitConfig::new(analytics_max, window, true)),
        );
        Self {
            store: store.clone(),
            router: router(state),
        }
    }

    /// Context where every assignment lands on the given variant.
    pub fn pinned_to(variant: ab_core::Variant) -> Self {
        let split = match variant {
            ab_core::Variant::A => TrafficSplit { a: 100.0, b: 0.0 },
            ab_core::Variant::B => TrafficSplit { a: 0.0, b: 100.0 },
        };
        Self::with_config(AbTestConfig {
            enabled: true,
            traffic_split: split,
        })
    }

    /// Test server over this context's router.
    pub fn server(&self) -> TestServer {
        TestServer::new(self.router.clone()).expect("Failed to create test server")
    }

    /// Test server that persists cookies across requests, like a browser.
    pub fn browser(&self) -> TestServer {
        let mut server = self.server();
        server.save_cookies();
        server
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
