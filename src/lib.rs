//! Orders Service Library
//!
//! Startup orchestration for an event-driven orders service: configuration
//! validation, NATS connection and listener registration, persistence
//! connection, HTTP activation, and coordinated shutdown.

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod messaging;
pub mod net;
pub mod observability;
pub mod persistence;

pub use config::schema::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::{Bootstrap, ShutdownCoordinator, Started};
