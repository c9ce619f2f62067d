//! Serverless entry point.
//!
//! # Example
//!
//! ```rust,ignore
//! use janis_listener::prelude::*;
//!
//! let handler = ServerlessHandler::new();
//! let response = handler.handle::<ProfileCreated>(invocation).await;
//! ```

use super::{
    config::HandlerConfig,
    invocation::{InvocationEvent, PlatformResponse},
    serializer::{ApiResponse, ResponseSerializer},
};
use crate::dispatcher::Dispatcher;
use janis_listener_core::{EnvelopeErrorCode, Error, Listener, Request, ServerlessHandlerError};
use serde_json::{Map, Value};

const MISSING_REQUEST_PATH_MESSAGE: &str =
    "requestPath not present in event object. Add a custom request mapping template to add it";

/// Maps platform invocations onto dispatchers and serializes their responses.
///
/// `ServerlessHandler` holds no per-request state and can be shared across
/// tasks; every invocation gets its own dispatcher and listener.
pub struct ServerlessHandler<S = ApiResponse> {
    config: HandlerConfig,
    serializer: S,
}

impl ServerlessHandler<ApiResponse> {
    /// Create a handler with the default configuration and serializer.
    pub fn new() -> Self {
        Self::with_config(HandlerConfig::default())
    }

    /// Create a handler with the default serializer.
    pub fn with_config(config: HandlerConfig) -> Self {
        Self {
            config,
            serializer: ApiResponse,
        }
    }
}

impl Default for ServerlessHandler<ApiResponse> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ResponseSerializer> ServerlessHandler<S> {
    /// Create a handler with a custom response serializer.
    pub fn with_serializer(config: HandlerConfig, serializer: S) -> Self {
        Self { config, serializer }
    }

    /// The handler configuration.
    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// Handle an invocation with a fresh `L`.
    pub async fn handle<L: Listener + Default>(&self, event: InvocationEvent) -> S::Output {
        self.handle_with(L::default(), event).await
    }

    /// Handle an invocation with the given listener.
    pub async fn handle_with<L: Listener>(&self, listener: L, event: InvocationEvent) -> S::Output {
        let response = self.run(listener, event).await;
        self.serializer.send(response)
    }

    /// Handle a raw JSON invocation payload.
    pub async fn handle_json<L: Listener + Default>(&self, payload: &str) -> Result<S::Output, Error> {
        let event: InvocationEvent = serde_json::from_str(payload)?;
        Ok(self.handle::<L>(event).await)
    }

    async fn run<L: Listener>(&self, listener: L, event: InvocationEvent) -> PlatformResponse {
        if self.config.require_request_path && event.request_path.is_none() {
            tracing::warn!("invocation without requestPath");
            return PlatformResponse::message(500, MISSING_REQUEST_PATH_MESSAGE);
        }

        tracing::debug!(
            method = ?event.method,
            request_path = ?event.request_path,
            "invocation received"
        );

        let dispatcher = match self
            .build_request(event)
            .and_then(|request| Dispatcher::with_listener(listener, request))
        {
            Ok(dispatcher) => dispatcher,
            Err(e) => {
                tracing::warn!(code = e.code().as_u8(), error = %e, "request envelope rejected");
                return PlatformResponse::message(400, e.message());
            }
        };

        PlatformResponse::from(dispatcher.dispatch().await)
    }

    fn build_request(&self, event: InvocationEvent) -> Result<Request, ServerlessHandlerError> {
        let InvocationEvent {
            headers,
            body,
            method,
            request_path,
            path,
            authorizer,
        } = event;

        Ok(Request {
            endpoint: request_path.map(|request_path| build_endpoint(&request_path, path.as_ref())),
            method: method.map(|method| method.to_lowercase()),
            data: body,
            headers,
            authentication_data: self.decode_authentication_data(authorizer.as_ref())?,
        })
    }

    fn decode_authentication_data(
        &self,
        authorizer: Option<&Value>,
    ) -> Result<Option<Value>, ServerlessHandlerError> {
        let Some(claim) = authorizer
            .and_then(Value::as_object)
            .and_then(|claims| claims.get(&self.config.auth_claim))
        else {
            return Ok(None);
        };

        match claim {
            Value::Null => Ok(None),
            Value::String(raw) if raw.is_empty() => Ok(None),
            Value::String(raw) => serde_json::from_str(raw).map(Some).map_err(|e| {
                ServerlessHandlerError::with_source(
                    format!("Authentication Data must be valid JSON: {e}"),
                    EnvelopeErrorCode::InvalidAuthenticationData,
                    e,
                )
            }),
            decoded => Ok(Some(decoded.clone())),
        }
    }
}

/// Resolve `{name}` placeholders of a request path and drop its leading `/`.
fn build_endpoint(request_path: &str, path: Option<&Map<String, Value>>) -> String {
    let mut endpoint = request_path
        .strip_prefix('/')
        .unwrap_or(request_path)
        .to_string();

    for (name, value) in path.into_iter().flatten() {
        let value = match value {
            Value::String(value) => value.clone(),
            other => other.to_string(),
        };
        endpoint = endpoint.replacen(&format!("{{{name}}}"), &value, 1);
    }

    endpoint
}
