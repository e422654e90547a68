//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validate config → Connect NATS → Subscribe signals
//!         → Register listeners → Connect store → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     SIGINT/SIGTERM → Close NATS → Close observed → Exit
//!     NATS closed on its own → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → stream consumed by the shutdown coordinator
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, messaging before persistence, listener last
//! - Only missing config and bind failures are fatal
//! - Exit happens once, with no drain

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{LifecycleState, ShutdownCoordinator, ShutdownLatch, ShutdownReason};
pub use signals::{termination_signals, Signal, SignalStream};
pub use startup::{Bootstrap, Started, StartupError};
