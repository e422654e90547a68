//! TCP listener activation.
//!
//! # Responsibilities
//! - Parse and bind the configured address
//! - Report the bound address (port 0 resolves here)

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ListenerConfig;

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The bind address does not parse.
    #[error("invalid bind address '{address}': {reason}")]
    Address { address: String, reason: String },

    /// Failed to bind to address.
    #[error("failed to bind: {0}")]
    Bind(#[from] std::io::Error),
}

/// Bind the configured address.
pub async fn bind(config: &ListenerConfig) -> Result<TcpListener, ListenerError> {
    let addr: SocketAddr = config
        .bind_address
        .parse()
        .map_err(|e: std::net::AddrParseError| ListenerError::Address {
            address: config.bind_address.clone(),
            reason: e.to_string(),
        })?;

    let listener = TcpListener::bind(addr).await?;

    tracing::debug!(address = %listener.local_addr()?, "Listener bound");

    Ok(listener)
}
