//! The append-only event/waitlist store.

use std::sync::Arc;

use ab_core::{AnalyticsEvent, Error, EventType, Result, Variant, WaitlistEntry};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::debug;

use crate::metrics::{self, VariantMetrics};

/// Capacity of the update-notification channel. Dashboards that fall this
/// far behind simply miss a tick and refresh on the next one.
const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// Fire-and-forget signal emitted after each write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreUpdate {
    EventStored,
    WaitlistUpdated,
}

/// Shared store handle.
pub type SharedStore = Arc<EventStore>;

/// In-memory store for analytics events and waitlist entries.
///
/// Constructed once at the composition root and passed by handle to every
/// handler; tests build their own isolated instances.
pub struct EventStore {
    events: Mutex<Vec<AnalyticsEvent>>,
    waitlist: Mutex<Vec<WaitlistEntry>>,
    updates: broadcast::Sender<StoreUpdate>,
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EventStore {
    pub fn new() -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            events: Mutex::new(Vec::new()),
            waitlist: Mutex::new(Vec::new()),
            updates,
        }
    }

    /// Subscribe to write notifications. Correctness never depends on any
    /// subscriber existing or keeping up.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreUpdate> {
        self.updates.subscribe()
    }

    fn notify(&self, update: StoreUpdate) {
        // No receivers is the normal case outside the dashboard.
        let _ = self.updates.send(update);
    }

    /// Append an analytics event. Validation happened upstream.
    pub fn store_event(&self, event: AnalyticsEvent) {
        {
            let mut events = self.events.lock();
            events.push(event);
        }
        self.notify(StoreUpdate::EventStored);
    }

    /// Append a waitlist entry unless the email is already registered.
    ///
    /// The email comparison is exact (case-sensitive, as stored); this is
    /// the system's only uniqueness constraint.
    pub fn store_waitlist_entry(&self, entry: WaitlistEntry) -> Result<()> {
        {
            let mut waitlist = self.waitlist.lock();
            if waitlist.iter().any(|e| e.email == entry.email) {
                debug!(email = %entry.email, "duplicate waitlist signup rejected");
                return Err(Error::DuplicateEmail);
            }
            waitlist.push(entry);
        }
        self.notify(StoreUpdate::WaitlistUpdated);
        Ok(())
    }

    /// All events, optionally including test-session traffic.
    pub fn events(&self, include_test: bool) -> Vec<AnalyticsEvent> {
        let events = self.events.lock();
        events
            .iter()
            .filter(|e| include_test || !e.is_test_session())
            .cloned()
            .collect()
    }

    /// Events of one type.
    pub fn events_by_type(&self, event_type: EventType, include_test: bool) -> Vec<AnalyticsEvent> {
        let events = self.events.lock();
        events
            .iter()
            .filter(|e| e.event_type == event_type)
            .filter(|e| include_test || !e.is_test_session())
            .cloned()
            .collect()
    }

    /// Events for one variant.
    pub fn events_by_variant(&self, variant: Variant, include_test: bool) -> Vec<AnalyticsEvent> {
        let events = self.events.lock();
        events
            .iter()
            .filter(|e| e.variant == variant)
            .filter(|e| include_test || !e.is_test_session())
            .cloned()
            .collect()
    }

    /// Waitlist entries, excluding test-session signups unless asked.
    ///
    /// An entry counts as test traffic when it was stamped as such at signup
    /// time, or when its linked session id matches any event flagged as test
    /// traffic. Unflagged entries with no session link are always included.
    pub fn waitlist_entries(&self, include_test: bool) -> Vec<WaitlistEntry> {
        if include_test {
            return self.waitlist.lock().clone();
        }

        // Snapshot test sessions first so the two locks never nest.
        let test_sessions: Vec<String> = {
            let events = self.events.lock();
            events
                .iter()
                .filter(|e| e.is_test_session())
                .map(|e| e.session_id.clone())
                .collect()
        };

        let waitlist = self.waitlist.lock();
        waitlist
            .iter()
            .filter(|entry| !entry.is_test_session())
            .filter(|entry| match entry.session_id() {
                Some(sid) => !test_sessions.iter().any(|t| t == sid),
                None => true,
            })
            .cloned()
            .collect()
    }

    /// Per-variant conversion metrics over the (optionally filtered) events.
    pub fn conversion_metrics(&self, include_test: bool) -> VariantMetrics {
        let events = self.events(include_test);
        metrics::variant_metrics(&events)
    }

    /// Count of distinct session ids, optionally variant-filtered.
    pub fn unique_sessions_count(&self, variant: Option<Variant>, include_test: bool) -> usize {
        let events = self.events.lock();
        metrics::unique_sessions_count(&events, variant, include_test)
    }

    /// Number of stored events (test traffic included).
    pub fn event_count(&self) -> usize {
        self.events.lock().len()
    }

    /// Number of stored waitlist entries (test traffic included).
    pub fn waitlist_count(&self) -> usize {
        self.waitlist.lock().len()
    }

    /// Irreversibly empty both collections. Safe to call repeatedly.
    pub fn clear_all(&self) {
        self.events.lock().clear();
        self.waitlist.lock().clear();
        self.notify(StoreUpdate::EventStored);
        self.notify(StoreUpdate::WaitlistUpdated);
    }
}
