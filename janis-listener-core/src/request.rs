//! The request envelope handed to a dispatcher.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The outer request wrapping one event.
///
/// Shapes are kept as raw JSON so the dispatcher can reject a malformed
/// envelope instead of failing deserialization. A JSON `null` deserializes to
/// `None` and is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// The invoked endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// The HTTP method. Must be `post` when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// The event payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Request headers. Must be an object when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Value>,
    /// Decoded authentication data. Must be an object when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_data: Option<Value>,
}

impl Request {
    /// Create a request carrying the given event payload.
    pub fn new(data: Value) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }

    /// Set the endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the method.
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Set the headers.
    pub fn headers(mut self, headers: Value) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Set the authentication data.
    pub fn authentication_data(mut self, authentication_data: Value) -> Self {
        self.authentication_data = Some(authentication_data);
        self
    }
}
