//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define service metrics (dependency health, listener registrations, events)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `orders_dependency_up` (gauge): 1=available, 0=unavailable, by dependency
//! - `orders_listener_registrations_total` (counter): by subject, outcome
//! - `orders_events_received_total` (counter): by subject, outcome
//! - `orders_shutdowns_total` (counter): by reason
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Labels are static strings, never payload data

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

/// Record whether a dependency came up.
pub fn record_dependency_up(dependency: &'static str, up: bool) {
    metrics::gauge!("orders_dependency_up", "dependency" => dependency)
        .set(if up { 1.0 } else { 0.0 });
}

/// Record one listener registration attempt.
pub fn record_listener_registration(subject: &'static str, outcome: &'static str) {
    metrics::counter!(
        "orders_listener_registrations_total",
        "subject" => subject,
        "outcome" => outcome
    )
    .increment(1);
}

/// Record one delivered event.
pub fn record_event(subject: &'static str, outcome: &'static str) {
    metrics::counter!(
        "orders_events_received_total",
        "subject" => subject,
        "outcome" => outcome
    )
    .increment(1);
}

/// Record the shutdown trigger.
pub fn record_shutdown(reason: &'static str) {
    metrics::counter!("orders_shutdowns_total", "reason" => reason).increment(1);
}
