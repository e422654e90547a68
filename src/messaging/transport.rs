//! Transport abstraction over the event bus.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use thiserror::Error;
use tokio::sync::watch;

use crate::config::MessagingConfig;

/// A message delivered on a subscribed subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub subject: String,
    pub payload: Vec<u8>,
}

/// Stream of messages for one subscription. Ends when the transport closes.
pub type Subscription = BoxStream<'static, Message>;

/// The single shared messaging handle.
pub type SharedTransport = Arc<dyn Transport>;

/// Errors that can occur talking to the event bus.
#[derive(Debug, Error)]
pub enum MessagingError {
    /// Initial connection failed. `url` is stored redacted.
    #[error("failed to connect to {url}: {reason}")]
    Connect { url: String, reason: String },

    /// Subscribing a listener failed.
    #[error("failed to subscribe to {subject}: {reason}")]
    Subscribe { subject: String, reason: String },

    /// Closing the connection failed.
    #[error("failed to close connection: {0}")]
    Close(String),

    /// No connection was established at startup.
    #[error("messaging connection unavailable")]
    Unavailable,

    /// The connection was already closed.
    #[error("messaging connection closed")]
    Closed,
}

/// An established event bus connection.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Subscribe to `subject` as a member of `queue_group`.
    async fn subscribe(&self, subject: &str, queue_group: &str)
        -> Result<Subscription, MessagingError>;

    /// Close the connection. Fires the close notice.
    async fn close(&self) -> Result<(), MessagingError>;

    /// Observe the connection closing.
    fn close_notice(&self) -> CloseNotice;
}

/// Establishes a transport. Exactly one attempt per call, no retry.
#[async_trait]
pub trait MessagingConnector: Send + Sync {
    async fn connect(&self, config: &MessagingConfig) -> Result<SharedTransport, MessagingError>;
}

/// Sender side of a transport's closed notification.
#[derive(Debug)]
pub struct CloseSignal {
    tx: watch::Sender<bool>,
}

impl CloseSignal {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// A receiver for this signal.
    pub fn notice(&self) -> CloseNotice {
        CloseNotice {
            rx: self.tx.subscribe(),
        }
    }

    /// Mark the transport closed. Returns true only for the first call.
    pub fn fire(&self) -> bool {
        self.tx.send_if_modified(|closed| {
            if *closed {
                false
            } else {
                *closed = true;
                true
            }
        })
    }

    pub fn is_fired(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for CloseSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiver side of a transport's closed notification.
#[derive(Debug, Clone)]
pub struct CloseNotice {
    rx: watch::Receiver<bool>,
}

impl CloseNotice {
    pub fn is_closed(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once the transport is closed. A dropped transport counts as closed.
    pub async fn closed(&mut self) {
        let _ = self.rx.wait_for(|closed| *closed).await;
    }
}
