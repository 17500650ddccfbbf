//! TCP listener binding.
//!
//! # Responsibilities
//! - Turn the listener config into a socket address
//! - Bind, reporting failures as a typed, fatal error

use std::net::{AddrParseError, IpAddr, SocketAddr};

use tokio::net::TcpListener;

use crate::config::ListenerConfig;

/// Error type for listener operations.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// Host is not an IP address.
    #[error("Invalid bind host `{host}`: {source}")]
    Address {
        host: String,
        source: AddrParseError,
    },

    /// Failed to bind to address (e.g. port already in use).
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        source: std::io::Error,
    },
}

/// Resolve the configured host and port.
pub fn socket_addr(config: &ListenerConfig) -> Result<SocketAddr, ListenerError> {
    let ip: IpAddr = config.host.parse().map_err(|source| ListenerError::Address {
        host: config.host.clone(),
        source,
    })?;
    Ok(SocketAddr::new(ip, config.port))
}

/// Bind to the configured address.
pub async fn bind(config: &ListenerConfig) -> Result<TcpListener, ListenerError> {
    let address = socket_addr(config)?;
    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| ListenerError::Bind { address, source })?;

    tracing::debug!(address = %address, "Listener bound");
    Ok(listener)
}
