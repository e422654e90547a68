//! Dependency availability state.
//!
//! # States
//! - Available: the connect attempt succeeded
//! - Unavailable: the connect attempt failed; the reason is kept for operator logs
//!
//! # Design Decisions
//! - Decided once at startup, never re-evaluated
//! - The service is degraded when any dependency is unavailable
//! - The application layer reads this instead of discovering failures per request

use serde::Serialize;

use crate::observability::metrics;

/// Outcome of one dependency's connect phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DependencyState {
    /// Connected.
    Available,
    /// Connect failed; startup continued without it. The reason is never
    /// serialized.
    Unavailable {
        #[serde(skip_serializing)]
        reason: String,
    },
}

impl DependencyState {
    /// Build a state from a connect result, recording the gauge for `dependency`.
    pub fn observe<T, E: std::fmt::Display>(
        dependency: &'static str,
        result: &Result<T, E>,
    ) -> Self {
        let state = match result {
            Ok(_) => DependencyState::Available,
            Err(e) => DependencyState::Unavailable {
                reason: e.to_string(),
            },
        };
        metrics::record_dependency_up(dependency, state.is_available());
        state
    }

    pub fn is_available(&self) -> bool {
        matches!(self, DependencyState::Available)
    }
}

/// Availability of every external dependency, as established at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceHealth {
    pub messaging: DependencyState,
    pub persistence: DependencyState,
}

impl ServiceHealth {
    /// True when any dependency is unavailable.
    pub fn is_degraded(&self) -> bool {
        !self.messaging.is_available() || !self.persistence.is_available()
    }

    /// Names of the unavailable dependencies.
    pub fn unavailable(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.messaging.is_available() {
            missing.push(super::MESSAGING);
        }
        if !self.persistence.is_available() {
            missing.push(super::PERSISTENCE);
        }
        missing
    }
}
