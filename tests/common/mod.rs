//! Shared in-memory collaborators for startup and shutdown tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use tokio::sync::mpsc;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use orders_service::config::validation::REQUIRED_VARS;
use orders_service::config::{redact_url, MessagingConfig, PersistenceConfig};
use orders_service::messaging::{
    CloseNotice, CloseSignal, Message, MessagingConnector, MessagingError, SharedTransport,
    Subscription, Transport,
};
use orders_service::persistence::{
    PersistenceConnector, PersistenceError, SharedStore, Store,
};

/// Ordered record of every external call made during a test.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn record(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn position(&self, entry: &str) -> Option<usize> {
        self.entries().iter().position(|e| e == entry)
    }
}

/// Log events emitted by this crate while installed, in order.
#[derive(Debug, Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<CapturedEvent>>>);

#[derive(Debug, Clone, Default)]
pub struct CapturedEvent {
    pub message: String,
    /// `key=value` for every other field.
    pub fields: Vec<String>,
}

impl LogCapture {
    /// Capture events on this thread until the guard drops.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.lock().unwrap().iter().map(|e| e.message.clone()).collect()
    }

    /// Every event rendered as one line, message first.
    pub fn lines(&self) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .map(|e| format!("{} {}", e.message, e.fields.join(" ")))
            .collect()
    }

    pub fn count(&self, message: &str) -> usize {
        self.messages().iter().filter(|m| m.as_str() == message).count()
    }

    /// Assert each of `expected` was logged, in this order. Other lines may sit between.
    pub fn assert_in_order(&self, expected: &[&str]) {
        let messages = self.messages();
        let mut from = 0;
        for wanted in expected {
            match messages[from..].iter().position(|m| m.as_str() == *wanted) {
                Some(offset) => from += offset + 1,
                None => panic!("expected {:?} after line {} in {:#?}", wanted, from, messages),
            }
        }
    }
}

impl<S: tracing::Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with("orders_service") {
            return;
        }
        let mut captured = CapturedEvent::default();
        event.record(&mut captured);
        self.0.lock().unwrap().push(captured);
    }
}

impl Visit for CapturedEvent {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}

/// A complete, valid environment.
pub fn full_env() -> HashMap<String, String> {
    let values = [
        "asdf",
        "900",
        "mongodb://orders:pw@orders-mongo-srv:27017/orders",
        "ticketing",
        "orders-test",
        "nats://nats-srv:4222",
    ];
    REQUIRED_VARS
        .iter()
        .zip(values)
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn lookup(env: HashMap<String, String>) -> impl Fn(&str) -> Option<String> {
    move |key| env.get(key).cloned()
}

/// In-memory event bus connection.
#[derive(Default)]
pub struct MockTransport {
    journal: Journal,
    senders: Mutex<HashMap<String, mpsc::UnboundedSender<Message>>>,
    subscribe_counts: Mutex<HashMap<String, usize>>,
    close_calls: AtomicUsize,
    closed: CloseSignal,
    fail_subjects: HashSet<String>,
    panic_subjects: HashSet<String>,
    close_fails: bool,
}

impl MockTransport {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            ..Default::default()
        }
    }

    /// Subscribing to `subject` returns an error.
    pub fn failing_on(mut self, subject: &str) -> Self {
        self.fail_subjects.insert(subject.to_string());
        self
    }

    /// Subscribing to `subject` panics.
    pub fn panicking_on(mut self, subject: &str) -> Self {
        self.panic_subjects.insert(subject.to_string());
        self
    }

    /// `close` returns an error and never fires the close notice.
    pub fn with_failing_close(mut self) -> Self {
        self.close_fails = true;
        self
    }

    /// Deliver `payload` to the subscriber of `subject`.
    pub fn publish(&self, subject: &str, payload: &[u8]) -> bool {
        let senders = self.senders.lock().unwrap();
        match senders.get(subject) {
            Some(tx) => tx
                .send(Message {
                    subject: subject.to_string(),
                    payload: payload.to_vec(),
                })
                .is_ok(),
            None => false,
        }
    }

    pub fn subscribe_count(&self, subject: &str) -> usize {
        self.subscribe_counts
            .lock()
            .unwrap()
            .get(subject)
            .copied()
            .unwrap_or(0)
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    /// Simulate the broker dropping the connection.
    pub fn drop_connection(&self) {
        self.senders.lock().unwrap().clear();
        self.closed.fire();
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn subscribe(
        &self,
        subject: &str,
        _queue_group: &str,
    ) -> Result<Subscription, MessagingError> {
        self.journal.record(format!("subscribe:{}", subject));
        *self
            .subscribe_counts
            .lock()
            .unwrap()
            .entry(subject.to_string())
            .or_default() += 1;

        if self.panic_subjects.contains(subject) {
            panic!("subscribe to {} exploded", subject);
        }
        if self.fail_subjects.contains(subject) {
            return Err(MessagingError::Subscribe {
                subject: subject.to_string(),
                reason: "permission denied".to_string(),
            });
        }

        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.lock().unwrap().insert(subject.to_string(), tx);

        Ok(stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|message| (message, rx))
        })
        .boxed())
    }

    async fn close(&self) -> Result<(), MessagingError> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        self.journal.record("close");
        if self.close_fails {
            return Err(MessagingError::Close("broker unreachable".to_string()));
        }
        self.drop_connection();
        Ok(())
    }

    fn close_notice(&self) -> CloseNotice {
        self.closed.notice()
    }
}

/// Messaging connector that hands out a prepared transport, or fails.
pub struct MockMessagingConnector {
    journal: Journal,
    transport: Option<Arc<MockTransport>>,
    attempts: Arc<AtomicUsize>,
}

impl MockMessagingConnector {
    pub fn reachable(journal: Journal, transport: Arc<MockTransport>) -> Self {
        Self {
            journal,
            transport: Some(transport),
            attempts: Arc::default(),
        }
    }

    pub fn unreachable(journal: Journal) -> Self {
        Self {
            journal,
            transport: None,
            attempts: Arc::default(),
        }
    }

    pub fn attempts(&self) -> Arc<AtomicUsize> {
        self.attempts.clone()
    }
}

#[async_trait]
impl MessagingConnector for MockMessagingConnector {
    async fn connect(&self, config: &MessagingConfig) -> Result<SharedTransport, MessagingError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.journal.record("messaging.connect");
        match &self.transport {
            Some(transport) => Ok(transport.clone() as SharedTransport),
            None => Err(MessagingError::Connect {
                url: redact_url(&config.url),
                reason: "connection refused".to_string(),
            }),
        }
    }
}

pub struct MockStore;

impl Store for MockStore {
    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Persistence connector that succeeds or fails on demand.
pub struct MockPersistenceConnector {
    journal: Journal,
    reachable: bool,
    attempts: Arc<AtomicUsize>,
}

impl MockPersistenceConnector {
    pub fn reachable(journal: Journal) -> Self {
        Self {
            journal,
            reachable: true,
            attempts: Arc::default(),
        }
    }

    pub fn unreachable(journal: Journal) -> Self {
        Self {
            journal,
            reachable: false,
            attempts: Arc::default(),
        }
    }

    pub fn attempts(&self) -> Arc<AtomicUsize> {
        self.attempts.clone()
    }
}

#[async_trait]
impl PersistenceConnector for MockPersistenceConnector {
    async fn connect(&self, _config: &PersistenceConfig) -> Result<SharedStore, PersistenceError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.journal.record("persistence.connect");
        if self.reachable {
            Ok(Arc::new(MockStore))
        } else {
            Err(PersistenceError::Connect("connection refused".to_string()))
        }
    }
}
