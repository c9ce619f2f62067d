//! Typed event record.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::fmt;

/// A business event, identified by its service, entity and event name.
///
/// Obtain one from a validated payload with [`ListenerContext::parse_event`].
///
/// [`ListenerContext::parse_event`]: crate::ListenerContext::parse_event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// The service that emitted the event.
    pub service: String,
    /// The entity the event is about.
    pub entity: String,
    /// The event name (e.g. `created`).
    pub event: String,
    /// The client the event belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    /// The id of the affected entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EventId>,
}

impl Event {
    /// Create an event with no client and no id.
    pub fn new(
        service: impl Into<String>,
        entity: impl Into<String>,
        event: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            entity: entity.into(),
            event: event.into(),
            client: None,
            id: None,
        }
    }

    /// Set the client.
    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = Some(client.into());
        self
    }

    /// Set the id.
    pub fn with_id(mut self, id: impl Into<EventId>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Deserialize an event from a JSON value.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }
}

/// An event id: either a string or a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventId {
    /// A string id.
    Text(String),
    /// A numeric id.
    Number(Number),
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        EventId::Text(value.to_string())
    }
}

impl From<String> for EventId {
    fn from(value: String) -> Self {
        EventId::Text(value)
    }
}

impl From<u64> for EventId {
    fn from(value: u64) -> Self {
        EventId::Number(value.into())
    }
}

impl From<i64> for EventId {
    fn from(value: i64) -> Self {
        EventId::Number(value.into())
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventId::Text(text) => f.write_str(text),
            EventId::Number(number) => write!(f, "{number}"),
        }
    }
}
