//! Splitpage A/B gateway
//!
//! Single-process server backing the marketing site:
//! - server-assigned variant routing with cookie persistence
//! - analytics event and waitlist ingestion with validation and rate limits
//! - in-memory storage with on-demand conversion metrics

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::info;

use ab_core::AbTestConfig;
use api::{router, AppState};
use event_store::EventStore;
use telemetry::init_tracing_from_env;

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    /// "production" enables rate limiting and the Secure cookie attribute.
    #[serde(default = "default_environment")]
    environment: String,

    #[serde(default)]
    ab_test: AbTestConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_environment() -> String {
    "development".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: default_environment(),
            ab_test: AbTestConfig::default(),
        }
    }
}

impl Config {
    fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing_from_env();

    info!("Starting Splitpage gateway v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;
    info!(
        environment = %config.environment,
        ab_enabled = config.ab_test.enabled,
        split_a = config.ab_test.traffic_split.a,
        "Loaded configuration"
    );

    let store = Arc::new(EventStore::new());
    let state = AppState::new(store, config.ab_test.clone(), config.is_production());

    // Bounded memory for the rate-limit map: sweep expired windows.
    let _sweep_handle = state.start_rate_limiter_sweep();
    info!("Started rate limiter sweep task (every 5 minutes)");

    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from defaults, optional file, and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        .add_source(config::Config::try_from(&Config::default())?)
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("SPLITPAGE")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Manual overrides for the nested experiment config; the config crate's
    // nested env parsing is unreliable with underscored field names.
    if let Ok(enabled) = std::env::var("SPLITPAGE_AB_TEST_ENABLED") {
        config.ab_test.enabled = enabled == "1" || enabled.eq_ignore_ascii_case("true");
    }
    if let Ok(split_a) = std::env::var("SPLITPAGE_AB_TEST_SPLIT_A") {
        if let Ok(value) = split_a.parse::<f64>() {
            config.ab_test.traffic_split.a = value;
            config.ab_test.traffic_split.b = 100.0 - value;
        }
    }
    if let Ok(environment) = std::env::var("SPLITPAGE_ENVIRONMENT") {
        config.environment = environment;
    }

    Ok(config)
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
