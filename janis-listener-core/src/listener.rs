//! # Listener
//!
//! A Listener handles one kind of business event. It is the only piece a
//! consumer has to write: implement [`Listener::process`] and, when needed,
//! tune validation through the flag methods or replace [`Listener::validate`].
//!
//! # Pipeline Position
//!
//! The dispatcher drives a listener through two hooks, in order:
//!
//! 1. **validate**: reject malformed events. The default implementation checks
//!    the event shape.
//! 2. **process**: run the business logic. Skipped when validation failed.
//!
//! Both hooks receive the request-scoped [`ListenerContext`]. They shape the
//! response through it; an error returned from a hook becomes an error
//! response, keeping any status code the hook set before failing.

use crate::{context::ListenerContext, error::BoxError, validator::validate_event_data};
use std::future::Future;

/// A handler for one business event type.
///
/// # Example
///
/// ```rust,ignore
/// struct ProfileCreated;
///
/// impl Listener for ProfileCreated {
///     fn must_have_client(&self) -> bool {
///         true
///     }
///
///     async fn process(&self, ctx: &mut ListenerContext) -> Result<(), BoxError> {
///         let client = ctx.event_client().unwrap_or_default().to_string();
///         ctx.set_body(json!({ "client": client }));
///         Ok(())
///     }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Listener`",
    label = "missing `Listener` implementation",
    note = "Listeners must implement the `process` method."
)]
pub trait Listener: Send + Sync + 'static {
    /// Whether events must carry a `client` property.
    fn must_have_client(&self) -> bool {
        false
    }

    /// Whether events must carry an `id` property.
    fn must_have_id(&self) -> bool {
        false
    }

    /// Whether the dispatcher should log the outcome of each event.
    fn should_create_log(&self) -> bool {
        false
    }

    /// Validate the received event.
    ///
    /// The default fails with a `MissingEvent` [`EventListenerError`] when no
    /// payload was received and with an `InvalidEvent` one when the payload
    /// has the wrong shape. Override it with `Ok(())` to accept any payload.
    ///
    /// [`EventListenerError`]: crate::EventListenerError
    fn validate(
        &self,
        ctx: &mut ListenerContext,
    ) -> impl Future<Output = Result<(), BoxError>> + Send {
        let result = validate_event_data(ctx.data(), self.must_have_client(), self.must_have_id());
        async move { result.map_err(BoxError::from) }
    }

    /// Process a validated event.
    fn process(
        &self,
        ctx: &mut ListenerContext,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;
}
