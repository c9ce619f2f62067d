//! # Dispatcher
//!
//! Drives one request through a [`Listener`]:
//!
//! ```text
//! Created -> Prepared -> SessionSet -> Validated -> Processed -> Responded
//! ```
//!
//! The envelope is checked when the dispatcher is built, before any listener
//! state exists. After that every failure is caught at the stage that raised
//! it and turned into an error response: nothing is retried and nothing
//! escapes [`Dispatcher::dispatch`].
//!
//! # Response Rules
//!
//! - A failed validation answers `400`, a failed process answers `500`, unless
//!   the listener already chose a code.
//! - The body of a failed request is always `{ "message": ... }`.
//! - A request that never set a code answers `200`.

use futures::FutureExt;
use janis_listener_core::{
    ApiSession, BoxError, EnvelopeErrorCode, Listener, ListenerContext, Request, Response,
    ServerlessHandlerError,
};
use serde_json::{Map, Value, json};
use std::{any::Any, panic::AssertUnwindSafe};

const DEFAULT_METHOD: &str = "post";
const INVALID_DATA_MESSAGE: &str = "Invalid data";
const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Position of a dispatcher in its pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DispatchStage {
    /// The envelope was accepted.
    Created,
    /// The listener context exists.
    Prepared,
    /// The session is attached to the context.
    SessionSet,
    /// The listener validated the event (successfully or not).
    Validated,
    /// The listener processed the event (successfully or not).
    Processed,
    /// The response was read.
    Responded,
}

/// Runs the dispatch pipeline for one request and one listener.
///
/// A dispatcher is single-use: build one per request.
pub struct Dispatcher<L> {
    listener: L,
    method: String,
    endpoint: Option<String>,
    data: Option<Value>,
    headers: Map<String, Value>,
    authentication_data: Option<Map<String, Value>>,
    context: ListenerContext,
    stage: DispatchStage,
    has_error: bool,
}

impl<L: Listener + Default> Dispatcher<L> {
    /// Build a dispatcher with a default listener instance.
    pub fn new(request: Request) -> Result<Self, ServerlessHandlerError> {
        Self::with_listener(L::default(), request)
    }
}

impl<L: Listener> Dispatcher<L> {
    /// Build a dispatcher for the given listener.
    ///
    /// Fails with an envelope error when the method is not `post` or when the
    /// headers or authentication data are not objects.
    pub fn with_listener(listener: L, request: Request) -> Result<Self, ServerlessHandlerError> {
        let Request {
            endpoint,
            method,
            data,
            headers,
            authentication_data,
        } = request;

        let method = normalize_method(method)?;
        let headers = into_object(
            headers,
            "Headers must be an Object",
            EnvelopeErrorCode::InvalidHeaders,
        )?;
        let authentication_data = into_object(
            authentication_data,
            "Authentication Data must be an Object",
            EnvelopeErrorCode::InvalidAuthenticationData,
        )?;

        Ok(Self {
            listener,
            method,
            endpoint: endpoint.as_deref().map(normalize_endpoint),
            data,
            headers: headers.unwrap_or_default(),
            authentication_data,
            context: ListenerContext::default(),
            stage: DispatchStage::Created,
            has_error: false,
        })
    }

    /// Run every stage in order and return the response.
    pub async fn dispatch(mut self) -> Response {
        self.prepare();
        self.set_session().await;
        self.validate().await;
        self.process().await;
        self.response();
        self.context.into_response()
    }

    /// Build the listener context from the request.
    ///
    /// Only the first call has an effect.
    pub fn prepare(&mut self) {
        if !self.enter(DispatchStage::Created, "prepare") {
            return;
        }

        self.context = ListenerContext::new(
            self.method.clone(),
            self.endpoint.take(),
            self.data.take(),
            std::mem::take(&mut self.headers),
        );
        self.stage = DispatchStage::Prepared;
        tracing::debug!(method = %self.method, endpoint = ?self.context.endpoint(), "listener context prepared");
    }

    /// Attach the caller's session to the context. Requires [`prepare`](Self::prepare).
    pub async fn set_session(&mut self) {
        if !self.enter(DispatchStage::Prepared, "set_session") {
            return;
        }

        let session = ApiSession::new(self.authentication_data.take());
        tracing::debug!(
            client_code = session.client_code().unwrap_or_default(),
            authenticated = session.is_authenticated(),
            "session attached"
        );
        self.context.set_session(session);
        self.stage = DispatchStage::SessionSet;
    }

    /// Let the listener validate the event. Requires [`set_session`](Self::set_session).
    pub async fn validate(&mut self) {
        if !self.enter(DispatchStage::SessionSet, "validate") {
            return;
        }

        let outcome = AssertUnwindSafe(self.listener.validate(&mut self.context))
            .catch_unwind()
            .await;

        if let Some(message) = failure_message(outcome) {
            tracing::warn!(error = %message, "event validation failed");
            self.set_response_error(message, INVALID_DATA_MESSAGE, 400);
        }
        self.stage = DispatchStage::Validated;
    }

    /// Let the listener process the event. Requires [`validate`](Self::validate)
    /// and is skipped after a failed validation.
    pub async fn process(&mut self) {
        if !self.enter(DispatchStage::Validated, "process") {
            return;
        }
        if self.has_error {
            tracing::debug!("process skipped after failed validation");
            return;
        }

        let outcome = AssertUnwindSafe(self.listener.process(&mut self.context))
            .catch_unwind()
            .await;

        if let Some(message) = failure_message(outcome) {
            tracing::warn!(error = %message, "event processing failed");
            self.set_response_error(message, INTERNAL_ERROR_MESSAGE, 500);
        }
        self.stage = DispatchStage::Processed;
    }

    /// The accumulated response, with `200` filled in when no code was set.
    ///
    /// Calling it again returns the same response.
    pub fn response(&mut self) -> &Response {
        self.context.response_mut().set_code_if_unset(200);

        if self.stage != DispatchStage::Responded {
            self.stage = DispatchStage::Responded;
            if self.listener.should_create_log() {
                self.log_outcome();
            }
        }

        self.context.response()
    }

    /// The last stage reached.
    pub fn stage(&self) -> DispatchStage {
        self.stage
    }

    /// Whether validation or processing failed.
    pub fn has_error(&self) -> bool {
        self.has_error
    }

    /// The listener context. Empty until [`prepare`](Self::prepare) runs.
    pub fn context(&self) -> &ListenerContext {
        &self.context
    }

    /// Whether a stage may run: the dispatcher must sit at `expected`.
    fn enter(&self, expected: DispatchStage, stage: &'static str) -> bool {
        if self.stage == expected {
            return true;
        }
        tracing::debug!(stage, current = ?self.stage, "stage called out of order, ignored");
        false
    }

    fn set_response_error(&mut self, message: String, fallback: &str, code: u16) {
        self.has_error = true;

        let message = if message.is_empty() {
            fallback.to_string()
        } else {
            message
        };

        self.context.response_mut().set_code_if_unset(code);
        self.context.set_body(json!({ "message": message }));
    }

    fn log_outcome(&self) {
        let ctx = &self.context;
        tracing::info!(
            service = ctx.event_service().unwrap_or_default(),
            entity = ctx.event_entity().unwrap_or_default(),
            event = ctx.event_name().unwrap_or_default(),
            client = ctx.event_client().unwrap_or_default(),
            code = ctx.response().code(),
            has_error = self.has_error,
            "event processed"
        );
    }
}

fn normalize_method(method: Option<String>) -> Result<String, ServerlessHandlerError> {
    match method {
        None => Ok(DEFAULT_METHOD.to_string()),
        Some(method) if method.eq_ignore_ascii_case(DEFAULT_METHOD) => Ok(method.to_ascii_lowercase()),
        Some(_) => Err(ServerlessHandlerError::new(
            "Method must be POST",
            EnvelopeErrorCode::InvalidMethod,
        )),
    }
}

fn into_object(
    value: Option<Value>,
    message: &str,
    code: EnvelopeErrorCode,
) -> Result<Option<Map<String, Value>>, ServerlessHandlerError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(ServerlessHandlerError::new(message, code)),
    }
}

/// Strip a leading `/` and a leading `api/` (any case).
fn normalize_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.strip_prefix('/').unwrap_or(endpoint);
    match endpoint.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("api/") => endpoint[4..].to_string(),
        _ => endpoint.to_string(),
    }
}

fn failure_message(outcome: Result<Result<(), BoxError>, Box<dyn Any + Send>>) -> Option<String> {
    match outcome {
        Ok(Ok(())) => None,
        Ok(Err(err)) => Some(err.to_string()),
        Err(panic) => {
            tracing::error!("listener panicked");
            Some(panic_message(panic.as_ref()))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct EchoListener;

    impl Listener for EchoListener {
        async fn process(&self, ctx: &mut ListenerContext) -> Result<(), BoxError> {
            let body = json!({ "method": ctx.method(), "endpoint": ctx.endpoint() });
            ctx.set_body(body);
            Ok(())
        }
    }

    fn sample_event() -> Value {
        json!({ "service": "id", "entity": "profile", "event": "created" })
    }

    #[test]
    fn test_envelope_rejections() {
        let cases = [
            (
                Request::new(sample_event()).method("get"),
                EnvelopeErrorCode::InvalidMethod,
            ),
            (
                Request::new(sample_event()).headers(json!([])),
                EnvelopeErrorCode::InvalidHeaders,
            ),
            (
                Request::new(sample_event()).headers(json!("x-foo")),
                EnvelopeErrorCode::InvalidHeaders,
            ),
            (
                Request::new(sample_event()).authentication_data(json!([])),
                EnvelopeErrorCode::InvalidAuthenticationData,
            ),
        ];

        for (request, code) in cases {
            let err = match Dispatcher::<EchoListener>::new(request) {
                Ok(_) => panic!("envelope should be rejected"),
                Err(err) => err,
            };
            assert_eq!(err.code(), code);
        }
    }

    #[test]
    fn test_method_is_case_insensitive() {
        let dispatcher = Dispatcher::<EchoListener>::new(Request::new(sample_event()).method("POST"))
            .unwrap();
        assert_eq!(dispatcher.method, "post");
        assert_eq!(dispatcher.stage(), DispatchStage::Created);
    }

    #[test]
    fn test_normalize_endpoint() {
        assert_eq!(normalize_endpoint("/api/listener/created"), "listener/created");
        assert_eq!(normalize_endpoint("API/listener"), "listener");
        assert_eq!(normalize_endpoint("listener/api/x"), "listener/api/x");
        assert_eq!(normalize_endpoint("/ap"), "ap");
    }

    #[tokio::test]
    async fn test_stages_advance_in_order() {
        let mut dispatcher = Dispatcher::<EchoListener>::new(
            Request::new(sample_event()).endpoint("/api/listener/created"),
        )
        .unwrap();

        dispatcher.prepare();
        assert_eq!(dispatcher.stage(), DispatchStage::Prepared);
        assert_eq!(dispatcher.context().endpoint(), Some("listener/created"));

        dispatcher.set_session().await;
        assert_eq!(dispatcher.stage(), DispatchStage::SessionSet);

        dispatcher.validate().await;
        assert_eq!(dispatcher.stage(), DispatchStage::Validated);
        assert!(!dispatcher.has_error());

        dispatcher.process().await;
        assert_eq!(dispatcher.stage(), DispatchStage::Processed);

        let first = dispatcher.response().clone();
        let second = dispatcher.response().clone();
        assert_eq!(first, second);
        assert_eq!(first.code(), Some(200));
        assert_eq!(dispatcher.stage(), DispatchStage::Responded);
    }

    #[tokio::test]
    async fn test_missing_event_answers_400() {
        let response = Dispatcher::<EchoListener>::new(Request::default())
            .unwrap()
            .dispatch()
            .await;

        assert_eq!(response.code(), Some(400));
        assert_eq!(response.body(), Some(&json!({ "message": "Missing event data" })));
    }

    #[tokio::test]
    async fn test_invalid_event_skips_process() {
        let mut dispatcher = Dispatcher::<EchoListener>::new(Request::new(json!("hi"))).unwrap();
        dispatcher.prepare();
        dispatcher.set_session().await;
        dispatcher.validate().await;
        assert!(dispatcher.has_error());

        dispatcher.process().await;
        assert_eq!(dispatcher.stage(), DispatchStage::Validated);

        let response = dispatcher.response();
        assert_eq!(response.code(), Some(400));
        assert_eq!(
            response.body(),
            Some(&json!({ "message": "Event should be an object. Received \"hi\"" }))
        );
    }

    #[derive(Default)]
    struct PanickingListener;

    impl Listener for PanickingListener {
        async fn process(&self, _ctx: &mut ListenerContext) -> Result<(), BoxError> {
            panic!("listener exploded");
        }
    }

    #[tokio::test]
    async fn test_process_panic_becomes_500() {
        let response = Dispatcher::<PanickingListener>::new(Request::new(sample_event()))
            .unwrap()
            .dispatch()
            .await;

        assert_eq!(response.code(), Some(500));
        assert_eq!(response.body(), Some(&json!({ "message": "listener exploded" })));
    }

    #[derive(Default)]
    struct PanickingValidator {
        process_calls: AtomicUsize,
    }

    impl Listener for PanickingValidator {
        async fn validate(&self, _ctx: &mut ListenerContext) -> Result<(), BoxError> {
            panic!("validator exploded");
        }

        async fn process(&self, _ctx: &mut ListenerContext) -> Result<(), BoxError> {
            self.process_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_validate_panic_becomes_400_and_skips_process() {
        let mut dispatcher =
            Dispatcher::<PanickingValidator>::new(Request::new(sample_event())).unwrap();
        dispatcher.prepare();
        dispatcher.set_session().await;
        dispatcher.validate().await;
        dispatcher.process().await;

        assert!(dispatcher.has_error());
        assert_eq!(dispatcher.stage(), DispatchStage::Validated);
        assert_eq!(dispatcher.listener.process_calls.load(Ordering::SeqCst), 0);

        let response = dispatcher.response();
        assert_eq!(response.code(), Some(400));
        assert_eq!(response.body(), Some(&json!({ "message": "validator exploded" })));
    }

    #[derive(Default)]
    struct OpaquePanicListener {
        in_validate: bool,
    }

    impl Listener for OpaquePanicListener {
        async fn validate(&self, _ctx: &mut ListenerContext) -> Result<(), BoxError> {
            if self.in_validate {
                std::panic::panic_any(5u8);
            }
            Ok(())
        }

        async fn process(&self, _ctx: &mut ListenerContext) -> Result<(), BoxError> {
            std::panic::panic_any(5u8);
        }
    }

    #[tokio::test]
    async fn test_opaque_panic_payload_uses_fallback_message() {
        let listener = OpaquePanicListener { in_validate: true };
        let response = Dispatcher::with_listener(listener, Request::new(sample_event()))
            .unwrap()
            .dispatch()
            .await;
        assert_eq!(response.code(), Some(400));
        assert_eq!(response.body(), Some(&json!({ "message": "Invalid data" })));

        let response = Dispatcher::<OpaquePanicListener>::new(Request::new(sample_event()))
            .unwrap()
            .dispatch()
            .await;
        assert_eq!(response.code(), Some(500));
        assert_eq!(
            response.body(),
            Some(&json!({ "message": "Internal server error" }))
        );
    }

    #[tokio::test]
    async fn test_stages_called_out_of_order_are_ignored() {
        let mut dispatcher = Dispatcher::<EchoListener>::new(Request::new(sample_event())).unwrap();

        dispatcher.set_session().await;
        dispatcher.validate().await;
        dispatcher.process().await;
        assert_eq!(dispatcher.stage(), DispatchStage::Created);
        assert!(!dispatcher.has_error());

        dispatcher.prepare();
        dispatcher.validate().await;
        assert_eq!(dispatcher.stage(), DispatchStage::Prepared);

        dispatcher.set_session().await;
        dispatcher.validate().await;
        dispatcher.process().await;
        assert_eq!(dispatcher.stage(), DispatchStage::Processed);

        let response = dispatcher.response();
        assert_eq!(response.code(), Some(200));
        assert_eq!(
            response.body(),
            Some(&json!({ "method": "post", "endpoint": null }))
        );
    }
}
