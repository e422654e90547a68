//! Store abstraction.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::PersistenceConfig;

/// The single shared persistence handle.
pub type SharedStore = Arc<dyn Store>;

/// Errors that can occur reaching the data store.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The URI could not be interpreted. The URI itself is not echoed.
    #[error("invalid persistence URI: {0}")]
    InvalidUri(String),

    /// No server answered the connect attempt.
    #[error("failed to connect to persistence store: {0}")]
    Connect(String),
}

/// An established data store connection.
pub trait Store: Send + Sync {
    /// Backend name for logs.
    fn backend(&self) -> &'static str;
}

/// Establishes a store. Exactly one attempt per call, no retry.
#[async_trait]
pub trait PersistenceConnector: Send + Sync {
    async fn connect(&self, config: &PersistenceConfig) -> Result<SharedStore, PersistenceError>;
}
