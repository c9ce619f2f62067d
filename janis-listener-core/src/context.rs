//! # Request-scoped listener context
//!
//! A [`ListenerContext`] carries everything a listener needs to handle one
//! event: the normalized request, the caller's session and the response being
//! built. The dispatcher creates it once per request and lends it mutably to
//! [`Listener::validate`] and [`Listener::process`]; it is consumed when the
//! response is read and never reused.
//!
//! [`Listener::validate`]: crate::Listener::validate
//! [`Listener::process`]: crate::Listener::process

use crate::{
    error::{EventErrorCode, EventListenerError},
    event::Event,
    response::Response,
    session::ApiSession,
};
use serde_json::{Map, Value};

/// Request-scoped state for one dispatched event.
#[derive(Debug, Clone, Default)]
pub struct ListenerContext {
    method: String,
    endpoint: Option<String>,
    data: Option<Value>,
    path_parameters: Vec<String>,
    headers: Map<String, Value>,
    cookies: Map<String, Value>,
    session: ApiSession,
    response: Response,
}

impl ListenerContext {
    /// Create a context for a normalized request.
    ///
    /// Path parameters and cookies start empty; the session is
    /// unauthenticated until one is attached.
    pub fn new(
        method: impl Into<String>,
        endpoint: Option<String>,
        data: Option<Value>,
        headers: Map<String, Value>,
    ) -> Self {
        Self {
            method: method.into(),
            endpoint,
            data,
            path_parameters: Vec::new(),
            headers,
            cookies: Map::new(),
            session: ApiSession::default(),
            response: Response::new(),
        }
    }

    /// Create a `post` context carrying only an event payload.
    pub fn for_event(data: Value) -> Self {
        Self::new("post", None, Some(data), Map::new())
    }

    /// The normalized, lowercase method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The invoked endpoint, without leading `/` or `api/`.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// The raw request payload.
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Path parameters. Always empty for event listeners.
    pub fn path_parameters(&self) -> &[String] {
        &self.path_parameters
    }

    /// Request headers.
    pub fn headers(&self) -> &Map<String, Value> {
        &self.headers
    }

    /// Look up a header by name, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&Value> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    /// Request cookies.
    pub fn cookies(&self) -> &Map<String, Value> {
        &self.cookies
    }

    /// The caller's session.
    pub fn session(&self) -> &ApiSession {
        &self.session
    }

    /// Attach the caller's session.
    pub fn set_session(&mut self, session: ApiSession) {
        self.session = session;
    }

    /// The response built so far.
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Mutable access to the response.
    pub fn response_mut(&mut self) -> &mut Response {
        &mut self.response
    }

    /// Consume the context, keeping only the response.
    pub fn into_response(self) -> Response {
        self.response
    }

    // Response shortcuts

    /// Set the response status code.
    pub fn set_code(&mut self, code: u16) -> &mut Self {
        self.response.set_code(code);
        self
    }

    /// Set the response body.
    pub fn set_body(&mut self, body: impl Into<Value>) -> &mut Self {
        self.response.set_body(body);
        self
    }

    /// Set a response header.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.response.set_header(name, value);
        self
    }

    /// Set a response cookie.
    pub fn set_cookie(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.response.set_cookie(name, value);
        self
    }

    // Event accessors

    /// The event payload. Same as [`data`](Self::data).
    pub fn event(&self) -> Option<&Value> {
        self.data()
    }

    /// The service that emitted the event.
    pub fn event_service(&self) -> Option<&str> {
        self.event_str("service")
    }

    /// The entity the event is about.
    pub fn event_entity(&self) -> Option<&str> {
        self.event_str("entity")
    }

    /// The event name (the `event` property of the payload).
    pub fn event_name(&self) -> Option<&str> {
        self.event_str("event")
    }

    /// The client the event belongs to.
    pub fn event_client(&self) -> Option<&str> {
        self.event_str("client")
    }

    /// The event id, which may be a string or a number.
    pub fn event_id(&self) -> Option<&Value> {
        self.data.as_ref()?.get("id")
    }

    /// Read the payload as a typed [`Event`].
    pub fn parse_event(&self) -> Result<Event, EventListenerError> {
        let data = self.data.as_ref().ok_or_else(|| {
            EventListenerError::new("Missing event data", EventErrorCode::MissingEvent)
        })?;
        Event::from_value(data).map_err(|e| EventListenerError::wrap(e, EventErrorCode::InvalidEvent))
    }

    fn event_str(&self, property: &str) -> Option<&str> {
        self.data.as_ref()?.get(property)?.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_event() -> Value {
        json!({
            "service": "id",
            "client": "fizzmod",
            "entity": "profile",
            "id": "5d699c1ae8ebb95eaa24aca9",
            "event": "created"
        })
    }

    #[test]
    fn test_event_accessors_with_data() {
        let ctx = ListenerContext::for_event(sample_event());

        assert_eq!(ctx.event(), Some(&sample_event()));
        assert_eq!(ctx.event_service(), Some("id"));
        assert_eq!(ctx.event_entity(), Some("profile"));
        assert_eq!(ctx.event_name(), Some("created"));
        assert_eq!(ctx.event_client(), Some("fizzmod"));
        assert_eq!(ctx.event_id(), Some(&json!("5d699c1ae8ebb95eaa24aca9")));
    }

    #[test]
    fn test_event_accessors_with_empty_data() {
        let ctx = ListenerContext::for_event(json!({}));

        assert_eq!(ctx.event(), Some(&json!({})));
        assert_eq!(ctx.event_service(), None);
        assert_eq!(ctx.event_entity(), None);
        assert_eq!(ctx.event_name(), None);
        assert_eq!(ctx.event_client(), None);
        assert_eq!(ctx.event_id(), None);
    }

    #[test]
    fn test_new_context_defaults() {
        let ctx = ListenerContext::new("post", Some("listener/created".into()), None, Map::new());

        assert_eq!(ctx.method(), "post");
        assert_eq!(ctx.endpoint(), Some("listener/created"));
        assert!(ctx.path_parameters().is_empty());
        assert!(ctx.cookies().is_empty());
        assert!(!ctx.session().is_authenticated());
        assert_eq!(ctx.response().code(), None);
    }

    #[test]
    fn test_header_lookup_ignores_case() {
        let Value::Object(headers) = json!({ "X-Foo": "bar" }) else {
            unreachable!()
        };
        let ctx = ListenerContext::new("post", None, None, headers);
        assert_eq!(ctx.header("x-foo"), Some(&json!("bar")));
    }

    #[test]
    fn test_parse_event() {
        let ctx = ListenerContext::for_event(sample_event());
        let event = ctx.parse_event().unwrap();
        assert_eq!(event.service, "id");
        assert_eq!(event.client.as_deref(), Some("fizzmod"));

        let ctx = ListenerContext::default();
        assert_eq!(ctx.parse_event().unwrap_err().code(), EventErrorCode::MissingEvent);
    }

    #[test]
    fn test_response_shortcuts() {
        let mut ctx = ListenerContext::for_event(sample_event());
        ctx.set_code(404).set_body(json!({ "message": "not found" }));

        let response = ctx.into_response();
        assert_eq!(response.code(), Some(404));
        assert_eq!(response.body(), Some(&json!({ "message": "not found" })));
    }
}
