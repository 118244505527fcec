//! Structured logging setup.

pub mod tracing_setup;

pub use tracing_setup::init_tracing_from_env;
