//! Session built from decoded authentication data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The session of the caller that emitted the event.
///
/// A session without authentication data is unauthenticated; it is still a
/// valid session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    authentication_data: Option<Map<String, Value>>,
}

impl ApiSession {
    /// Create a session. `None` makes it unauthenticated.
    pub fn new(authentication_data: Option<Map<String, Value>>) -> Self {
        Self {
            authentication_data,
        }
    }

    /// The decoded authentication data.
    pub fn authentication_data(&self) -> Option<&Map<String, Value>> {
        self.authentication_data.as_ref()
    }

    /// Whether authentication data was received.
    pub fn is_authenticated(&self) -> bool {
        self.authentication_data.is_some()
    }

    /// The client code, if the caller was authenticated as a client.
    pub fn client_code(&self) -> Option<&str> {
        self.get("clientCode").and_then(Value::as_str)
    }

    /// The id of the authenticated user.
    pub fn user_id(&self) -> Option<&str> {
        self.get("userId").and_then(Value::as_str)
    }

    /// Look up a raw authentication data field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.authentication_data.as_ref()?.get(key)
    }
}
