//! Error types for event listeners.
//!
//! Two disjoint taxonomies are kept so callers can tell a bad envelope from a
//! bad business event:
//!
//! - [`ServerlessHandlerError`] - The outer request (method, headers,
//!   authentication data) is malformed. Raised before dispatch starts.
//! - [`EventListenerError`] - The event payload is missing or malformed.
//!   Raised by [`Listener::validate`].
//!
//! Both keep the error that caused them as their [`source`].
//!
//! [`Listener::validate`]: crate::Listener::validate
//! [`source`]: std::error::Error::source

use std::fmt;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for listener operations that can fail outside the
/// dispatch pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// The request envelope was rejected.
    #[error(transparent)]
    Envelope(#[from] ServerlessHandlerError),

    /// The event payload was rejected.
    #[error(transparent)]
    Event(#[from] EventListenerError),

    /// A raw invocation payload could not be deserialized.
    #[error("deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),
}

/// Codes for envelope errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EnvelopeErrorCode {
    /// The method was present and was not `post`.
    InvalidMethod = 1,
    /// The headers were present and were not an object.
    InvalidHeaders = 2,
    /// The authentication data was present and was not an object.
    InvalidAuthenticationData = 3,
}

impl EnvelopeErrorCode {
    /// The numeric value of the code.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Codes for event errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EventErrorCode {
    /// No event payload was received.
    MissingEvent = 1,
    /// The event payload failed shape validation.
    InvalidEvent = 2,
}

impl EventErrorCode {
    /// The numeric value of the code.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// An envelope error, raised while building a dispatcher.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct ServerlessHandlerError {
    message: String,
    code: EnvelopeErrorCode,
    #[source]
    previous_error: Option<BoxError>,
}

impl ServerlessHandlerError {
    /// Create an error from a message.
    pub fn new(message: impl Into<String>, code: EnvelopeErrorCode) -> Self {
        Self {
            message: message.into(),
            code,
            previous_error: None,
        }
    }

    /// Create an error that wraps another one, reusing its message.
    pub fn wrap(err: impl Into<BoxError>, code: EnvelopeErrorCode) -> Self {
        let err = err.into();
        Self {
            message: err.to_string(),
            code,
            previous_error: Some(err),
        }
    }

    /// Create an error with its own message that keeps `err` as its source.
    pub fn with_source(
        message: impl Into<String>,
        code: EnvelopeErrorCode,
        err: impl Into<BoxError>,
    ) -> Self {
        Self {
            message: message.into(),
            code,
            previous_error: Some(err.into()),
        }
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The error code.
    pub fn code(&self) -> EnvelopeErrorCode {
        self.code
    }

    /// The wrapped error, if any.
    pub fn previous_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.previous_error.as_deref()
    }
}

/// An event error, raised while validating the event payload.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct EventListenerError {
    message: String,
    code: EventErrorCode,
    #[source]
    previous_error: Option<BoxError>,
}

impl EventListenerError {
    /// Create an error from a message.
    pub fn new(message: impl Into<String>, code: EventErrorCode) -> Self {
        Self {
            message: message.into(),
            code,
            previous_error: None,
        }
    }

    /// Create an error that wraps another one, reusing its message.
    pub fn wrap(err: impl Into<BoxError>, code: EventErrorCode) -> Self {
        let err = err.into();
        Self {
            message: err.to_string(),
            code,
            previous_error: Some(err),
        }
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The error code.
    pub fn code(&self) -> EventErrorCode {
        self.code
    }

    /// The wrapped error, if any.
    pub fn previous_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.previous_error.as_deref()
    }
}

/// The first rule an event payload broke during shape validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventShapeError {
    message: String,
}

impl EventShapeError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Get the error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for EventShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EventShapeError {}
