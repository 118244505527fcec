//! In-memory event and waitlist storage with on-demand aggregation.
//!
//! Storage is explicitly ephemeral: two append-only vectors behind mutexes,
//! bounded by process lifetime. Every mutation is a single atomic append, so
//! there are no partial-write states to recover from.

pub mod metrics;
pub mod store;

pub use metrics::{unique_sessions_count, variant_metrics, VariantMetrics};
pub use store::{EventStore, SharedStore, StoreUpdate};
