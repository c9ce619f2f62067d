//! Platform invocation and response payloads.

use janis_listener_core::Response;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// An HTTP-triggered invocation as delivered by the platform.
///
/// Produced by a custom request mapping template, so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationEvent {
    /// Request headers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Value>,

    /// The request body: the event payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,

    /// The HTTP method, in any case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// The resource path template (e.g. `/api/listener/{entity}`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_path: Option<String>,

    /// Values for the path template placeholders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Map<String, Value>>,

    /// Claims set by the platform authorizer. Only an object carries claims.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorizer: Option<Value>,
}

impl InvocationEvent {
    /// Create an invocation carrying the given body.
    pub fn new(body: Value) -> Self {
        Self {
            body: Some(body),
            ..Self::default()
        }
    }

    /// Set the headers.
    pub fn headers(mut self, headers: Value) -> Self {
        self.headers = Some(headers);
        self
    }

    /// Set the method.
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Set the resource path template.
    pub fn request_path(mut self, request_path: impl Into<String>) -> Self {
        self.request_path = Some(request_path.into());
        self
    }

    /// Set the value of one path template placeholder.
    pub fn path_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.path
            .get_or_insert_with(Map::new)
            .insert(name.into(), value.into());
        self
    }

    /// Set an authorizer claim.
    pub fn claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut claims = match self.authorizer.take() {
            Some(Value::Object(claims)) => claims,
            _ => Map::new(),
        };
        claims.insert(name.into(), value.into());
        self.authorizer = Some(Value::Object(claims));
        self
    }
}

/// The response handed to the platform response serializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformResponse {
    /// HTTP status code.
    pub status_code: u16,

    /// Response body.
    pub body: Value,

    /// Response headers, when the listener set any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Map<String, Value>>,

    /// Response cookies, when the listener set any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookies: Option<Map<String, Value>>,
}

impl PlatformResponse {
    /// A response with a `{ "message": ... }` body and nothing else.
    pub fn message(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            body: json!({ "message": message.into() }),
            headers: None,
            cookies: None,
        }
    }
}

impl From<Response> for PlatformResponse {
    fn from(response: Response) -> Self {
        let (code, body, headers, cookies) = response.into_parts();
        Self {
            status_code: code.unwrap_or(200),
            body: body.unwrap_or_else(|| Value::Object(Map::new())),
            headers: (!headers.is_empty()).then_some(headers),
            cookies: (!cookies.is_empty()).then_some(cookies),
        }
    }
}
