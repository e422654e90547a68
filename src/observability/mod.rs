//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Startup phases, listeners, shutdown coordinator produce:
//!     → logging.rs (structured log events, one per phase)
//!     → metrics.rs (dependency gauges, registration and event counters)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod logging;
pub mod metrics;
