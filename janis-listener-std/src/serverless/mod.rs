//! # Serverless
//!
//! Adapter between a serverless platform and the [`Dispatcher`].
//!
//! An HTTP-triggered invocation arrives as an [`InvocationEvent`]. The
//! [`ServerlessHandler`] turns it into a [`Request`], rejects a malformed
//! envelope with `400`, drives a fresh dispatcher and hands the result to a
//! [`ResponseSerializer`].
//!
//! [`Dispatcher`]: crate::dispatcher::Dispatcher
//! [`Request`]: janis_listener_core::Request

mod config;
mod handler;
mod invocation;
mod serializer;

pub use config::{DEFAULT_AUTH_CLAIM, HandlerConfig};
pub use handler::ServerlessHandler;
pub use invocation::{InvocationEvent, PlatformResponse};
pub use serializer::{ApiResponse, ResponseSerializer};
