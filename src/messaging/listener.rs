//! Listener contract and the per-subscription consume loop.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::messaging::events::Subject;
use crate::messaging::transport::{MessagingError, SharedTransport};
use crate::observability::metrics;

/// Errors raised while handling one delivered event.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("malformed {subject} payload: {source}")]
    Decode {
        subject: Subject,
        #[source]
        source: serde_json::Error,
    },
}

/// A handler bound to one subject.
#[async_trait]
pub trait Listener: Send + Sync + 'static {
    fn subject(&self) -> Subject;

    /// Handle one payload. Errors are logged by the consume loop; they never
    /// stop the subscription.
    async fn on_message(&self, payload: &[u8]) -> Result<(), HandlerError>;
}

/// Decode a JSON payload for `subject`.
pub fn decode<T: DeserializeOwned>(subject: Subject, payload: &[u8]) -> Result<T, HandlerError> {
    serde_json::from_slice(payload).map_err(|source| HandlerError::Decode { subject, source })
}

/// Subscribe `listener` on `transport` and spawn its consume loop.
///
/// Returns once the subscription is in place; the loop runs until the
/// subscription stream ends.
pub async fn listen(
    listener: Arc<dyn Listener>,
    transport: SharedTransport,
    queue_group: String,
) -> Result<JoinHandle<()>, MessagingError> {
    let subject = listener.subject();
    let mut subscription = transport.subscribe(subject.as_str(), &queue_group).await?;

    Ok(tokio::spawn(async move {
        while let Some(message) = subscription.next().await {
            match listener.on_message(&message.payload).await {
                Ok(()) => metrics::record_event(subject.as_str(), "handled"),
                Err(e) => {
                    tracing::warn!(subject = %subject, error = %e, "Dropping event");
                    metrics::record_event(subject.as_str(), "rejected");
                }
            }
        }
        tracing::info!(subject = %subject, "Subscription ended");
    }))
}
