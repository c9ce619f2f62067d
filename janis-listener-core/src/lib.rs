//! # janis-listener-core
//!
//! Core traits and types for serverless event listeners.
//!
//! This crate has minimal dependencies and is meant to be imported by crates
//! that only define listeners. The dispatcher and the serverless handler live
//! in `janis-listener-std`.
//!
//! # Building Blocks
//!
//! - [`Listener`] - The consumer-implemented contract: `validate` + `process`.
//! - [`ListenerContext`] - Request-scoped state lent to a listener: the
//!   request, the [`ApiSession`] and the [`Response`] being built.
//! - [`EventValidator`] - Structural validation of event payloads.
//! - [`Event`] - Typed view of a validated event.
//! - [`Request`] - The envelope a dispatcher is built from.
//!
//! # Error Types
//!
//! - [`ServerlessHandlerError`] - Malformed envelope (pre-dispatch)
//! - [`EventListenerError`] - Missing or malformed event (validation)
//! - [`Error`] - Top-level error type

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod context;
mod error;
mod event;
mod listener;
mod request;
mod response;
mod session;
mod validator;

// Re-exports
pub use context::ListenerContext;
pub use error::{
    BoxError, EnvelopeErrorCode, Error, EventErrorCode, EventListenerError, EventShapeError,
    ServerlessHandlerError,
};
pub use event::{Event, EventId};
pub use listener::Listener;
pub use request::Request;
pub use response::Response;
pub use session::ApiSession;
pub use validator::{EventValidator, is_truthy, validate_event_data};
