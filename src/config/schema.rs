//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the orders
//! service. Required values come from the environment (see `loader.rs`);
//! everything else has a default.

use std::fmt;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::config::redact::redact_url;

/// Fixed port the service accepts traffic on.
pub const DEFAULT_PORT: u16 = 3000;

/// Default NATS queue group shared by every listener of this service.
pub const DEFAULT_QUEUE_GROUP: &str = "orders-service";

/// Root configuration for the orders service.
#[derive(Debug)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Event bus connection settings.
    pub messaging: MessagingConfig,

    /// Data store connection settings.
    pub persistence: PersistenceConfig,

    /// Signing key for the auth layer.
    pub auth: AuthConfig,

    /// Order business settings consumed by the application layer.
    pub orders: OrdersConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: format!("0.0.0.0:{}", DEFAULT_PORT),
        }
    }
}

/// NATS connection settings.
#[derive(Clone, Deserialize, Serialize)]
pub struct MessagingConfig {
    /// Broker cluster identity.
    pub cluster_id: String,

    /// Client identity presented to the broker.
    pub client_id: String,

    /// Broker address (e.g., "nats://nats-srv:4222").
    pub url: String,

    /// Queue group every listener subscribes under.
    #[serde(default = "default_queue_group")]
    pub queue_group: String,
}

fn default_queue_group() -> String {
    DEFAULT_QUEUE_GROUP.to_string()
}

impl fmt::Debug for MessagingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessagingConfig")
            .field("cluster_id", &self.cluster_id)
            .field("client_id", &self.client_id)
            .field("url", &redact_url(&self.url))
            .field("queue_group", &self.queue_group)
            .finish()
    }
}

/// Persistence connection settings.
///
/// Everything except `uri` is the fixed option set applied to every connect.
#[derive(Clone, Deserialize, Serialize)]
pub struct PersistenceConfig {
    /// Data store location. May carry credentials; never log it.
    pub uri: String,

    /// Maximum pooled connections per server.
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: u32,

    /// Seconds to wait for a usable server before the connect attempt fails.
    #[serde(default = "default_server_selection_timeout_secs")]
    pub server_selection_timeout_secs: u64,

    /// Name reported to the database server.
    #[serde(default = "default_application_name")]
    pub application_name: String,
}

fn default_max_pool_size() -> u32 {
    10
}

fn default_server_selection_timeout_secs() -> u64 {
    30
}

fn default_application_name() -> String {
    "orders-service".to_string()
}

impl fmt::Debug for PersistenceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistenceConfig")
            .field("uri", &redact_url(&self.uri))
            .field("max_pool_size", &self.max_pool_size)
            .field(
                "server_selection_timeout_secs",
                &self.server_selection_timeout_secs,
            )
            .field("application_name", &self.application_name)
            .finish()
    }
}

impl PersistenceConfig {
    /// Build settings for `uri` with the fixed option set.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            max_pool_size: default_max_pool_size(),
            server_selection_timeout_secs: default_server_selection_timeout_secs(),
            application_name: default_application_name(),
        }
    }
}

/// Auth settings. Only the key lives here; token handling is elsewhere.
#[derive(Debug)]
pub struct AuthConfig {
    /// JWT signing key.
    pub jwt_key: SecretString,
}

/// Order settings.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct OrdersConfig {
    /// Seconds a reserved order stays open before it expires. `None` when the
    /// configured value has no leading digits.
    pub expiration_window_secs: Option<u64>,
}

impl OrdersConfig {
    /// Expiration window rendered as minutes, for operator logs.
    pub fn expiration_window_minutes(&self) -> Option<f64> {
        self.expiration_window_secs.map(|secs| secs as f64 / 60.0)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Prometheus scrape address. Metrics are off when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_address: None,
        }
    }
}

/// Log line rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, for development.
    Pretty,
    /// One JSON object per line, for log aggregation.
    Json,
}
