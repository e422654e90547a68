//! NATS transport.
//!
//! # Responsibilities
//! - One connection attempt per connect call
//! - Queue-group subscriptions for listeners
//! - Explicit close: drain the client, fire the close notice
//! - Fire the close notice when the client reports the connection closed
//!
//! # Design Decisions
//! - No connect timeout of our own; the client library's applies
//! - Disconnects are logged only; the client reconnects on its own
//! - Client id becomes the connection name so the broker can tell instances apart
//! - The broker URL only appears redacted

use std::sync::Arc;

use async_nats::{ConnectOptions, Event};
use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::sync::Mutex;

use crate::config::{redact_url, MessagingConfig};
use crate::messaging::transport::{
    CloseNotice, CloseSignal, Message, MessagingConnector, MessagingError, SharedTransport,
    Subscription, Transport,
};

/// Connects to a NATS server.
#[derive(Debug, Default, Clone, Copy)]
pub struct NatsConnector;

impl NatsConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MessagingConnector for NatsConnector {
    async fn connect(&self, config: &MessagingConfig) -> Result<SharedTransport, MessagingError> {
        let transport = NatsTransport::connect(config).await?;
        Ok(Arc::new(transport))
    }
}

/// An open NATS connection.
pub struct NatsTransport {
    /// `None` once closed.
    client: Mutex<Option<async_nats::Client>>,
    closed: Arc<CloseSignal>,
}

impl NatsTransport {
    /// Connect once to `config.url`.
    pub async fn connect(config: &MessagingConfig) -> Result<Self, MessagingError> {
        let closed = Arc::new(CloseSignal::new());
        let cluster_id = config.cluster_id.clone();
        let on_close = closed.clone();

        let client = ConnectOptions::new()
            .name(config.client_id.clone())
            .event_callback(move |event| {
                let cluster_id = cluster_id.clone();
                let closed = on_close.clone();
                async move { on_event(event, &cluster_id, &closed) }
            })
            .connect(config.url.as_str())
            .await
            .map_err(|e| MessagingError::Connect {
                url: redact_url(&config.url),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client: Mutex::new(Some(client)),
            closed,
        })
    }

    async fn client(&self) -> Result<async_nats::Client, MessagingError> {
        self.client.lock().await.clone().ok_or(MessagingError::Closed)
    }
}

fn on_event(event: Event, cluster_id: &str, closed: &CloseSignal) {
    match event {
        Event::Connected => tracing::info!(cluster_id = %cluster_id, "NATS connection established"),
        Event::Disconnected => {
            tracing::warn!(cluster_id = %cluster_id, "NATS connection lost, reconnecting")
        }
        Event::Closed => {
            if closed.fire() {
                tracing::debug!(cluster_id = %cluster_id, "NATS client reported connection closed");
            }
        }
        other => tracing::debug!(cluster_id = %cluster_id, event = ?other, "NATS event"),
    }
}

#[async_trait]
impl Transport for NatsTransport {
    async fn subscribe(
        &self,
        subject: &str,
        queue_group: &str,
    ) -> Result<Subscription, MessagingError> {
        let client = self.client().await?;
        let subscriber = client
            .queue_subscribe(subject.to_string(), queue_group.to_string())
            .await
            .map_err(|e| MessagingError::Subscribe {
                subject: subject.to_string(),
                reason: e.to_string(),
            })?;

        Ok(subscriber
            .map(|message| Message {
                subject: message.subject.to_string(),
                payload: message.payload.to_vec(),
            })
            .boxed())
    }

    /// Drain and close the connection. Subscriptions end once drained.
    async fn close(&self) -> Result<(), MessagingError> {
        let Some(client) = self.client.lock().await.take() else {
            return Ok(());
        };

        let drained = client.drain().await;
        self.closed.fire();

        drained.map_err(|e| MessagingError::Close(e.to_string()))
    }

    fn close_notice(&self) -> CloseNotice {
        self.closed.notice()
    }
}
