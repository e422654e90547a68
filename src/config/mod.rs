//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment
//!     → loader.rs (lookup required + optional variables)
//!     → validation.rs (presence and interpretation, first failure wins)
//!     → ServiceConfig (validated, immutable)
//!     → handed by value to each startup phase
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - Required values have no defaults; everything else does
//! - Only absent values are fatal; a malformed expiration window is logged
//! - Lookup is injectable so tests never touch the process environment

pub mod loader;
pub mod redact;
pub mod schema;
pub mod validation;

pub use loader::{load_from_env, load_with, ConfigError};
pub use redact::redact_url;
pub use schema::{
    AuthConfig, ListenerConfig, LogFormat, MessagingConfig, ObservabilityConfig, OrdersConfig,
    PersistenceConfig, ServiceConfig,
};
