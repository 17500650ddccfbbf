//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the optional metrics exporter
//! - Bind the listener and build the server
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, including an exporter that was
//!   asked for and could not start
//! - Listener binds last (traffic only when ready)
//! - Logging is installed by the caller before this runs

use std::net::{AddrParseError, SocketAddr};

use metrics_exporter_prometheus::BuildError;
use tokio::net::TcpListener;

use crate::config::EchoConfig;
use crate::http::HttpServer;
use crate::net::{self, ListenerError};
use crate::observability::metrics;

/// Error type for startup failures.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Invalid metrics address `{address}`: {source}")]
    MetricsAddress {
        address: String,
        source: AddrParseError,
    },

    #[error("Failed to start metrics exporter: {0}")]
    Metrics(#[from] BuildError),

    #[error(transparent)]
    Listener(#[from] ListenerError),
}

/// Initialize subsystems in order and return a server ready to run.
pub async fn prepare(config: EchoConfig) -> Result<(HttpServer, TcpListener), StartupError> {
    if config.observability.metrics_enabled {
        let address = &config.observability.metrics_address;
        let addr: SocketAddr = address.parse().map_err(|source| StartupError::MetricsAddress {
            address: address.clone(),
            source,
        })?;
        metrics::init_metrics(addr)?;
    }

    let listener = net::bind(&config.listener).await?;
    Ok((HttpServer::new(config), listener))
}
