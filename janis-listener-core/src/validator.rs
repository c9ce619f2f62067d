//! Structural validation of event payloads.

use crate::error::{EventErrorCode, EventListenerError, EventShapeError};
use serde_json::{Map, Value};

/// Validates the shape of an event payload.
///
/// Validation stops at the first broken rule; the error names the offending
/// property and the value that was received.
pub struct EventValidator;

impl EventValidator {
    /// Validate an event payload.
    ///
    /// Rules, in order:
    /// 1. the payload is an object;
    /// 2. `service`, `entity` and `event` are present and are strings;
    /// 3. `client` is present when `must_have_client` is set;
    /// 4. `client`, when present, is a string;
    /// 5. `id` is present when `must_have_id` is set;
    /// 6. `id`, when present, is a string or a number.
    pub fn validate(
        event: &Value,
        must_have_client: bool,
        must_have_id: bool,
    ) -> Result<(), EventShapeError> {
        let Value::Object(event) = event else {
            return Err(EventShapeError::new(format!(
                "Event should be an object. Received {}",
                inspect(event)
            )));
        };

        require_string(event, "service", "Event service")?;
        require_string(event, "entity", "Event entity")?;
        require_string(event, "event", "Event event name")?;

        if must_have_client {
            require_present(event, "client")?;
        }

        if let Some(client) = event.get("client") {
            if !client.is_string() {
                return Err(EventShapeError::new(format!(
                    "Event client should be a string. Received {}",
                    inspect(client)
                )));
            }
        }

        if must_have_id {
            require_present(event, "id")?;
        }

        if let Some(id) = event.get("id") {
            if !(id.is_string() || id.is_number()) {
                return Err(EventShapeError::new(format!(
                    "Event id should be a string or a number. Received {}",
                    inspect(id)
                )));
            }
        }

        Ok(())
    }
}

/// Validate the data a listener received, as the default
/// [`Listener::validate`] does.
///
/// Absent, falsy or empty-object data is a [`EventErrorCode::MissingEvent`];
/// any shape violation is an [`EventErrorCode::InvalidEvent`] wrapping the
/// validator error.
///
/// [`Listener::validate`]: crate::Listener::validate
pub fn validate_event_data(
    data: Option<&Value>,
    must_have_client: bool,
    must_have_id: bool,
) -> Result<(), EventListenerError> {
    let event = match data {
        Some(Value::Object(map)) if map.is_empty() => None,
        Some(value) if is_truthy(value) => Some(value),
        _ => None,
    };

    let Some(event) = event else {
        return Err(EventListenerError::new(
            "Missing event data",
            EventErrorCode::MissingEvent,
        ));
    };

    EventValidator::validate(event, must_have_client, must_have_id)
        .map_err(|e| EventListenerError::wrap(e, EventErrorCode::InvalidEvent))
}

/// JSON truthiness: `null`, `false`, `0` and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn require_present(event: &Map<String, Value>, property: &str) -> Result<(), EventShapeError> {
    match event.get(property) {
        Some(value) if is_truthy(value) => Ok(()),
        _ => Err(EventShapeError::new(format!(
            "Missing required property {property}"
        ))),
    }
}

fn require_string(
    event: &Map<String, Value>,
    property: &str,
    label: &str,
) -> Result<(), EventShapeError> {
    require_present(event, property)?;

    match event.get(property) {
        Some(Value::String(_)) => Ok(()),
        other => Err(EventShapeError::new(format!(
            "{label} should be a string. Received {}",
            other.map(inspect).unwrap_or_else(|| "undefined".to_string())
        ))),
    }
}

fn inspect(value: &Value) -> String {
    value.to_string()
}
