//! Testing utilities for event listeners.
//!
//! # Features
//!
//! - [`RecordingSerializer`]: A response serializer that keeps every response it sends
//! - [`SpyListener`]: A listener that counts its calls and can be told to fail

use crate::serverless::{PlatformResponse, ResponseSerializer};
use janis_listener_core::{BoxError, Listener, ListenerContext, validate_event_data};
use serde_json::Value;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Recording Serializer
// ============================================================================

/// A serializer that records every response it sends.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingSerializer::new();
/// let handler = ServerlessHandler::with_serializer(HandlerConfig::new(), recorder.clone());
///
/// handler.handle::<MyListener>(invocation).await;
///
/// assert_eq!(recorder.count(), 1);
/// assert_eq!(recorder.last().unwrap().status_code, 200);
/// ```
#[derive(Clone, Default)]
pub struct RecordingSerializer {
    responses: Arc<Mutex<Vec<PlatformResponse>>>,
}

impl RecordingSerializer {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a clone of the sent responses.
    pub fn responses(&self) -> Vec<PlatformResponse> {
        self.responses.lock().unwrap().clone()
    }

    /// Get the number of sent responses.
    pub fn count(&self) -> usize {
        self.responses.lock().unwrap().len()
    }

    /// Get the most recent response.
    pub fn last(&self) -> Option<PlatformResponse> {
        self.responses.lock().unwrap().last().cloned()
    }
}

impl ResponseSerializer for RecordingSerializer {
    type Output = PlatformResponse;

    fn send(&self, response: PlatformResponse) -> Self::Output {
        self.responses.lock().unwrap().push(response.clone());
        response
    }
}

// ============================================================================
// Spy Listener
// ============================================================================

#[derive(Clone)]
struct Failure {
    message: String,
    code: Option<u16>,
}

/// A listener that counts its calls and can be programmed to fail.
///
/// Clones share their counters, so a clone can be handed to a dispatcher and
/// the first one inspected afterwards.
///
/// # Example
///
/// ```rust,ignore
/// let spy = SpyListener::new();
/// handler.handle_with(spy.clone(), invocation).await;
///
/// assert_eq!(spy.validate_count(), 1);
/// assert_eq!(spy.process_count(), 1);
/// ```
#[derive(Clone, Default)]
pub struct SpyListener {
    validate_calls: Arc<AtomicUsize>,
    process_calls: Arc<AtomicUsize>,
    events: Arc<Mutex<Vec<Value>>>,
    validation_failure: Arc<Mutex<Option<Failure>>>,
    process_failure: Arc<Mutex<Option<Failure>>>,
    body: Arc<Mutex<Option<Value>>>,
}

impl SpyListener {
    /// Create a spy that validates like the default listener and succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail validation with the given message.
    pub fn fail_validation(&self, message: impl Into<String>) {
        *self.validation_failure.lock().unwrap() = Some(Failure {
            message: message.into(),
            code: None,
        });
    }

    /// Set `code` on the response, then fail validation.
    pub fn fail_validation_with_code(&self, message: impl Into<String>, code: u16) {
        *self.validation_failure.lock().unwrap() = Some(Failure {
            message: message.into(),
            code: Some(code),
        });
    }

    /// Fail processing with the given message.
    pub fn fail_process(&self, message: impl Into<String>) {
        *self.process_failure.lock().unwrap() = Some(Failure {
            message: message.into(),
            code: None,
        });
    }

    /// Set `code` on the response, then fail processing.
    pub fn fail_process_with_code(&self, message: impl Into<String>, code: u16) {
        *self.process_failure.lock().unwrap() = Some(Failure {
            message: message.into(),
            code: Some(code),
        });
    }

    /// Body to set when processing succeeds.
    pub fn set_body(&self, body: Value) {
        *self.body.lock().unwrap() = Some(body);
    }

    /// Number of times `validate` was called.
    pub fn validate_count(&self) -> usize {
        self.validate_calls.load(Ordering::SeqCst)
    }

    /// Number of times `process` was called.
    pub fn process_count(&self) -> usize {
        self.process_calls.load(Ordering::SeqCst)
    }

    /// Events seen by `process`.
    pub fn events(&self) -> Vec<Value> {
        self.events.lock().unwrap().clone()
    }
}

fn apply_failure(ctx: &mut ListenerContext, failure: Failure) -> BoxError {
    if let Some(code) = failure.code {
        ctx.set_code(code);
    }
    failure.message.into()
}

impl Listener for SpyListener {
    async fn validate(&self, ctx: &mut ListenerContext) -> Result<(), BoxError> {
        self.validate_calls.fetch_add(1, Ordering::SeqCst);

        let failure = self.validation_failure.lock().unwrap().clone();
        match failure {
            Some(failure) => Err(apply_failure(ctx, failure)),
            None => validate_event_data(ctx.data(), false, false).map_err(BoxError::from),
        }
    }

    async fn process(&self, ctx: &mut ListenerContext) -> Result<(), BoxError> {
        self.process_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(event) = ctx.event() {
            self.events.lock().unwrap().push(event.clone());
        }

        let failure = self.process_failure.lock().unwrap().clone();
        if let Some(failure) = failure {
            return Err(apply_failure(ctx, failure));
        }

        let body = self.body.lock().unwrap().clone();
        if let Some(body) = body {
            ctx.set_body(body);
        }
        Ok(())
    }
}
