//! HTTP API layer for the Splitpage gateway.

pub mod cookies;
pub mod extractors;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

pub use routes::router;
pub use state::AppState;
