//! Listener registration.
//!
//! # Responsibilities
//! - Subscribe every configured listener on the shared transport
//! - Isolate registrations: one failure or panic never blocks the others
//! - Never subscribe the same subject twice
//!
//! # Design Decisions
//! - Registrations run concurrently, each in its own task
//! - Runs even when messaging is unavailable; every listener then reports failed
//! - The registrar owns the consume-loop handles for the life of the service

use std::collections::HashSet;
use std::sync::Arc;

use futures_util::future::join_all;
use tokio::task::JoinHandle;

use crate::messaging::events::Subject;
use crate::messaging::listener::{listen, Listener};
use crate::messaging::transport::{MessagingError, SharedTransport};
use crate::observability::metrics;

/// Result of registering one listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Registered,
    /// The subject already has a live subscription on this registrar.
    AlreadyRegistered,
    Failed(String),
}

impl RegistrationOutcome {
    fn label(&self) -> &'static str {
        match self {
            RegistrationOutcome::Registered => "registered",
            RegistrationOutcome::AlreadyRegistered => "duplicate",
            RegistrationOutcome::Failed(_) => "failed",
        }
    }
}

/// Per-listener outcomes of one registration pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationReport {
    pub outcomes: Vec<(Subject, RegistrationOutcome)>,
}

impl RegistrationReport {
    fn record(&mut self, subject: Subject, outcome: RegistrationOutcome) {
        metrics::record_listener_registration(subject.as_str(), outcome.label());
        self.outcomes.push((subject, outcome));
    }

    /// Subjects newly subscribed in this pass.
    pub fn registered(&self) -> Vec<Subject> {
        self.with_outcome(|o| matches!(o, RegistrationOutcome::Registered))
    }

    /// Subjects whose registration failed in this pass.
    pub fn failed(&self) -> Vec<Subject> {
        self.with_outcome(|o| matches!(o, RegistrationOutcome::Failed(_)))
    }

    fn with_outcome(&self, pred: impl Fn(&RegistrationOutcome) -> bool) -> Vec<Subject> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| pred(outcome))
            .map(|(subject, _)| *subject)
            .collect()
    }
}

/// Attaches a fixed set of listeners to the messaging handle.
pub struct ListenerRegistrar {
    queue_group: String,
    listeners: Vec<Arc<dyn Listener>>,
    registered: HashSet<Subject>,
    tasks: Vec<JoinHandle<()>>,
}

impl ListenerRegistrar {
    pub fn new(queue_group: impl Into<String>, listeners: Vec<Arc<dyn Listener>>) -> Self {
        Self {
            queue_group: queue_group.into(),
            listeners,
            registered: HashSet::new(),
            tasks: Vec::new(),
        }
    }

    /// Register every listener not yet subscribed.
    ///
    /// `transport` is `None` when the messaging connect failed; each listener
    /// is then reported as failed without touching the bus.
    pub async fn register_all(&mut self, transport: Option<&SharedTransport>) -> RegistrationReport {
        let mut report = RegistrationReport::default();
        let mut in_flight = HashSet::new();
        let mut pending = Vec::new();

        for listener in &self.listeners {
            let subject = listener.subject();

            if self.registered.contains(&subject) || !in_flight.insert(subject) {
                tracing::debug!(subject = %subject, "Listener already registered");
                report.record(subject, RegistrationOutcome::AlreadyRegistered);
                continue;
            }

            match transport {
                Some(transport) => {
                    let setup = listen(listener.clone(), transport.clone(), self.queue_group.clone());
                    pending.push((subject, tokio::spawn(setup)));
                }
                None => {
                    tracing::error!(
                        subject = %subject,
                        error = %MessagingError::Unavailable,
                        "Listener not registered"
                    );
                    report.record(
                        subject,
                        RegistrationOutcome::Failed(MessagingError::Unavailable.to_string()),
                    );
                }
            }
        }

        let (subjects, setups): (Vec<_>, Vec<_>) = pending.into_iter().unzip();
        let results = join_all(setups).await;

        for (subject, result) in subjects.into_iter().zip(results) {
            match result {
                Ok(Ok(task)) => {
                    tracing::info!(
                        subject = %subject,
                        queue_group = %self.queue_group,
                        "Listener registered"
                    );
                    self.registered.insert(subject);
                    self.tasks.push(task);
                    report.record(subject, RegistrationOutcome::Registered);
                }
                Ok(Err(e)) => {
                    tracing::error!(subject = %subject, error = %e, "Listener registration failed");
                    report.record(subject, RegistrationOutcome::Failed(e.to_string()));
                }
                Err(e) => {
                    tracing::error!(subject = %subject, error = %e, "Listener setup panicked");
                    report.record(subject, RegistrationOutcome::Failed(e.to_string()));
                }
            }
        }

        report
    }

    /// Subjects with a live subscription.
    pub fn registered(&self) -> Vec<Subject> {
        let mut subjects: Vec<Subject> = self.registered.iter().copied().collect();
        subjects.sort();
        subjects
    }

    pub fn queue_group(&self) -> &str {
        &self.queue_group
    }
}

impl std::fmt::Debug for ListenerRegistrar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistrar")
            .field("queue_group", &self.queue_group)
            .field("listeners", &self.listeners.len())
            .field("registered", &self.registered())
            .finish()
    }
}
