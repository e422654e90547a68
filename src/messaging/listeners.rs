//! The orders service's event listeners.
//!
//! Each listener decodes its payload and hands it on. What an order does with
//! a ticket or an expiry belongs to the application layer.

use std::sync::Arc;

use async_trait::async_trait;

use crate::messaging::events::{
    ExpirationCompleteEvent, Subject, TicketCreatedEvent, TicketUpdatedEvent,
};
use crate::messaging::listener::{decode, HandlerError, Listener};

/// Listens for newly created tickets.
#[derive(Debug, Default)]
pub struct TicketCreatedListener;

#[async_trait]
impl Listener for TicketCreatedListener {
    fn subject(&self) -> Subject {
        Subject::TicketCreated
    }

    async fn on_message(&self, payload: &[u8]) -> Result<(), HandlerError> {
        let event: TicketCreatedEvent = decode(self.subject(), payload)?;
        tracing::info!(
            ticket_id = %event.id,
            version = event.version,
            "Ticket created event received"
        );
        Ok(())
    }
}

/// Listens for ticket updates.
#[derive(Debug, Default)]
pub struct TicketUpdatedListener;

#[async_trait]
impl Listener for TicketUpdatedListener {
    fn subject(&self) -> Subject {
        Subject::TicketUpdated
    }

    async fn on_message(&self, payload: &[u8]) -> Result<(), HandlerError> {
        let event: TicketUpdatedEvent = decode(self.subject(), payload)?;
        tracing::info!(
            ticket_id = %event.id,
            version = event.version,
            reserved = event.order_id.is_some(),
            "Ticket updated event received"
        );
        Ok(())
    }
}

/// Listens for elapsed order expiration windows.
#[derive(Debug, Default)]
pub struct ExpirationCompleteListener;

#[async_trait]
impl Listener for ExpirationCompleteListener {
    fn subject(&self) -> Subject {
        Subject::ExpirationComplete
    }

    async fn on_message(&self, payload: &[u8]) -> Result<(), HandlerError> {
        let event: ExpirationCompleteEvent = decode(self.subject(), payload)?;
        tracing::info!(order_id = %event.order_id, "Expiration complete event received");
        Ok(())
    }
}

/// The listener set registered at startup.
pub fn order_listeners() -> Vec<Arc<dyn Listener>> {
    vec![
        Arc::new(TicketCreatedListener),
        Arc::new(TicketUpdatedListener),
        Arc::new(ExpirationCompleteListener),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_listeners_cover_each_subject_once() {
        let mut subjects: Vec<Subject> = order_listeners().iter().map(|l| l.subject()).collect();
        subjects.sort();
        assert_eq!(
            subjects,
            vec![
                Subject::TicketCreated,
                Subject::TicketUpdated,
                Subject::ExpirationComplete
            ]
        );
    }

    #[tokio::test]
    async fn test_ticket_created_decodes() {
        let payload = br#"{"id":"t1","title":"concert","price":20,"userId":"u1","version":0}"#;
        TicketCreatedListener.on_message(payload).await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_payload_is_rejected() {
        let err = ExpirationCompleteListener
            .on_message(b"not json")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("expiration:complete"));
    }

    #[tokio::test]
    async fn test_missing_field_is_rejected() {
        let payload = br#"{"id":"t1","title":"concert"}"#;
        assert!(TicketUpdatedListener.on_message(payload).await.is_err());
    }
}
