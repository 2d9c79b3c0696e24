//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Initialize logging, then metrics
//! - Bind the listener last, once everything else is ready
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - No config file means the built-in defaults

use std::net::SocketAddr;
use std::path::Path;

use axum::http::header::InvalidHeaderName;
use metrics_exporter_prometheus::BuildError;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{load_config, ConfigError, GatewayConfig, ObservabilityConfig};
use crate::observability::{logging, metrics};
use crate::routing::{RouteError, RouteTableError};

/// Fatal error while bringing the gateway up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error(transparent)]
    Services(#[from] RouteTableError),
    #[error("invalid identity header: {0}")]
    IdentityHeader(#[from] InvalidHeaderName),
    #[error("invalid metrics address `{0}`")]
    MetricsAddress(String),
    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] BuildError),
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Load configuration from `path`, or the defaults when none is given.
pub fn load(path: Option<&Path>) -> Result<GatewayConfig, StartupError> {
    match path {
        Some(path) => Ok(load_config(path)?),
        None => Ok(GatewayConfig::default()),
    }
}

/// Install the log subscriber and, when enabled, the metrics exporter.
pub fn init_observability(config: &ObservabilityConfig) -> Result<(), StartupError> {
    logging::init(config);

    if config.metrics_enabled {
        let addr: SocketAddr = config
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }
    Ok(())
}

pub async fn bind(address: &str) -> Result<TcpListener, StartupError> {
    let listener = TcpListener::bind(address).await.map_err(|source| StartupError::Bind {
        address: address.to_string(),
        source,
    })?;
    if let Ok(local) = listener.local_addr() {
        tracing::info!(address = %local, "Listening for connections");
    }
    Ok(listener)
}
