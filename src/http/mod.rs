//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Bound TcpListener (from startup)
//!     → server.rs (Axum setup, middleware, health endpoint)
//!     → request.rs (request ID)
//!     → [application routes] (outside this crate's scope)
//! ```

pub mod request;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use server::{AppState, DependencyUnavailable, HttpServer};
