//! # janis-listener - Serverless Event Listeners
//!
//! `janis-listener` adapts business-event listeners to an HTTP-triggered
//! serverless platform. A consumer writes one [`Listener`] per event type;
//! the [`ServerlessHandler`] does the rest:
//!
//! 1. map the platform invocation to a [`Request`]
//! 2. reject a malformed envelope with `400`
//! 3. run the [`Dispatcher`] pipeline: prepare, session, validate, process
//! 4. hand the response to the platform serializer
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use janis_listener::prelude::*;
//!
//! #[derive(Default)]
//! struct ProfileCreated;
//!
//! impl Listener for ProfileCreated {
//!     fn must_have_client(&self) -> bool {
//!         true
//!     }
//!
//!     async fn process(&self, ctx: &mut ListenerContext) -> Result<(), BoxError> {
//!         ctx.set_body(json!({ "client": ctx.event_client() }));
//!         Ok(())
//!     }
//! }
//!
//! let handler = ServerlessHandler::new();
//! let response = handler.handle::<ProfileCreated>(invocation).await;
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use janis_listener_core::{
    // Session
    ApiSession,
    // Error types
    BoxError,
    EnvelopeErrorCode,
    Error,
    // Event
    Event,
    EventErrorCode,
    EventId,
    EventListenerError,
    EventShapeError,
    EventValidator,
    // Listener
    Listener,
    ListenerContext,
    // Envelope
    Request,
    Response,
    ServerlessHandlerError,
    is_truthy,
    validate_event_data,
};

// Dispatching
pub use janis_listener_std::dispatcher::{DispatchStage, Dispatcher};

// Serverless
pub use janis_listener_std::serverless::{
    ApiResponse, DEFAULT_AUTH_CLAIM, HandlerConfig, InvocationEvent, PlatformResponse,
    ResponseSerializer, ServerlessHandler,
};

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use janis_listener_std::testing::*;
}

/// Prelude module - common imports for listener crates.
///
/// # Usage
///
/// ```rust,ignore
/// use janis_listener::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        ApiSession,
        // Errors
        BoxError,
        EventListenerError,
        // Handler
        HandlerConfig,
        InvocationEvent,
        // Core traits
        Listener,
        ListenerContext,
        ServerlessHandler,
    };
    pub use serde_json::json;
}
