//! Event subjects and payloads consumed by the orders service.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Event bus subjects this service listens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Subject {
    TicketCreated,
    TicketUpdated,
    ExpirationComplete,
}

impl Subject {
    /// Wire name of the subject.
    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::TicketCreated => "ticket:created",
            Subject::TicketUpdated => "ticket:updated",
            Subject::ExpirationComplete => "expiration:complete",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A ticket became available for ordering.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketCreatedEvent {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub user_id: String,
    pub version: u64,
}

/// A ticket changed; `order_id` is set while it is reserved.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketUpdatedEvent {
    pub id: String,
    pub title: String,
    pub price: f64,
    pub user_id: String,
    pub version: u64,
    #[serde(default)]
    pub order_id: Option<String>,
}

/// An order's expiration window elapsed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpirationCompleteEvent {
    pub order_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_wire_names() {
        assert_eq!(Subject::TicketCreated.to_string(), "ticket:created");
        assert_eq!(Subject::TicketUpdated.as_str(), "ticket:updated");
        assert_eq!(Subject::ExpirationComplete.as_str(), "expiration:complete");
    }

    #[test]
    fn test_ticket_updated_camel_case() {
        let event: TicketUpdatedEvent = serde_json::from_str(
            r#"{"id":"t1","title":"concert","price":20.5,"userId":"u1","version":2,"orderId":"o9"}"#,
        )
        .unwrap();
        assert_eq!(event.user_id, "u1");
        assert_eq!(event.order_id.as_deref(), Some("o9"));

        let event: TicketUpdatedEvent = serde_json::from_str(
            r#"{"id":"t1","title":"concert","price":20.5,"userId":"u1","version":3}"#,
        )
        .unwrap();
        assert!(event.order_id.is_none());
    }
}
