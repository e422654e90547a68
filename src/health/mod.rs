//! Dependency health subsystem.
//!
//! # Data Flow
//! ```text
//! Startup phases (lifecycle/startup.rs):
//!     messaging connect result  → DependencyState
//!     persistence connect result → DependencyState
//!     → ServiceHealth (degraded flags)
//!     → handed to the HTTP layer (health endpoint, request guards)
//! ```
//!
//! # Design Decisions
//! - Connection failures are values, not swallowed errors
//! - No background re-probing; state reflects startup only

pub mod state;

pub use state::{DependencyState, ServiceHealth};

/// Dependency label for the event bus.
pub const MESSAGING: &str = "messaging";
/// Dependency label for the data store.
pub const PERSISTENCE: &str = "persistence";
