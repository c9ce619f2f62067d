//! Response accumulator.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The response a listener builds up while an event is dispatched.
///
/// Every setter overwrites the previous value. The status code stays `None`
/// until someone sets it, so the dispatcher can tell a code chosen by the
/// listener from one it has to fill in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    body: Option<Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    headers: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    cookies: Map<String, Value>,
}

impl Response {
    /// Create an empty response.
    pub fn new() -> Self {
        Self::default()
    }

    /// The status code, if one was set.
    pub fn code(&self) -> Option<u16> {
        self.code
    }

    /// The body, if one was set.
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Response headers.
    pub fn headers(&self) -> &Map<String, Value> {
        &self.headers
    }

    /// Response cookies.
    pub fn cookies(&self) -> &Map<String, Value> {
        &self.cookies
    }

    /// Set the status code.
    pub fn set_code(&mut self, code: u16) -> &mut Self {
        self.code = Some(code);
        self
    }

    /// Set the code unless one is already set. Returns whether it was set.
    pub fn set_code_if_unset(&mut self, code: u16) -> bool {
        if self.code.is_some() {
            return false;
        }
        self.code = Some(code);
        true
    }

    /// Set the body.
    pub fn set_body(&mut self, body: impl Into<Value>) -> &mut Self {
        self.body = Some(body.into());
        self
    }

    /// Set one header.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set one cookie.
    pub fn set_cookie(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Split the response into its parts.
    pub fn into_parts(self) -> (Option<u16>, Option<Value>, Map<String, Value>, Map<String, Value>) {
        (self.code, self.body, self.headers, self.cookies)
    }
}
