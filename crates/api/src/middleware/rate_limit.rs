//! Fixed-window rate limiting.
//!
//! One counter per client identifier, reset when its window expires. This is
//! the system's only backpressure mechanism: over-quota requests are rejected
//! outright with retry information, nothing is queued.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

/// Rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests allowed per window.
    pub max_requests: u32,
    /// Window length.
    pub window: Duration,
    /// When false, every check passes (non-production default).
    pub enabled: bool,
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window: Duration, enabled: bool) -> Self {
        Self {
            max_requests,
            window,
            enabled,
        }
    }
}

struct WindowEntry {
    count: u32,
    reset_at: Instant,
}

/// Fixed-window counter keyed by client identifier.
pub struct RateLimiter {
    entries: Mutex<HashMap<String, WindowEntry>>,
    config: RateLimitConfig,
}

/// Shared rate limiter state.
pub type SharedRateLimiter = Arc<RateLimiter>;

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            config,
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.config.max_requests
    }

    /// Check whether this request puts the client over quota.
    ///
    /// Counts the request unless the client is already at the cap; at/over
    /// the cap the count stays put and the call returns true.
    pub fn is_rate_limited(&self, identifier: &str) -> bool {
        if !self.config.enabled {
            return false;
        }

        let now = Instant::now();
        let mut entries = self.entries.lock();

        match entries.get_mut(identifier) {
            Some(entry) if now < entry.reset_at => {
                if entry.count >= self.config.max_requests {
                    return true;
                }
                entry.count += 1;
                false
            }
            _ => {
                // First request, or the previous window expired.
                entries.insert(
                    identifier.to_string(),
                    WindowEntry {
                        count: 1,
                        reset_at: now + self.config.window,
                    },
                );
                false
            }
        }
    }

    /// Requests left in the current window.
    pub fn remaining_requests(&self, identifier: &str) -> u32 {
        let entries = self.entries.lock();
        match entries.get(identifier) {
            Some(entry) if Instant::now() < entry.reset_at => {
                self.config.max_requests.saturating_sub(entry.count)
            }
            _ => self.config.max_requests,
        }
    }

    /// Seconds until the client's window resets, rounded up.
    pub fn retry_after_secs(&self, identifier: &str) -> u64 {
        let entries = self.entries.lock();
        let now = Instant::now();
        match entries.get(identifier) {
            Some(entry) if now < entry.reset_at => {
                let remaining = entry.reset_at - now;
                remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0)
            }
            _ => self.config.window.as_secs(),
        }
    }

    /// Epoch milliseconds at which the client's window resets.
    pub fn reset_epoch_millis(&self, identifier: &str) -> i64 {
        let now_epoch = chrono::Utc::now().timestamp_millis();
        let entries = self.entries.lock();
        let now = Instant::now();
        match entries.get(identifier) {
            Some(entry) if now < entry.reset_at => {
                now_epoch + (entry.reset_at - now).as_millis() as i64
            }
            _ => now_epoch + self.config.window.as_millis() as i64,
        }
    }

    /// Drop entries whose window has expired, bounding memory growth.
    pub fn cleanup(&self) {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        entries.retain(|_, entry| now < entry.reset_at);
    }

    #[cfg(test)]
    fn entry_count(&self) -> usize {
        self.entries.lock().len()
    }
}
