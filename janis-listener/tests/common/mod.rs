#![allow(dead_code)]

use janis_listener::{BoxError, InvocationEvent, Listener, ListenerContext};
use serde_json::{Value, json};

// ============================================================================
// Test Payloads
// ============================================================================

pub fn sample_event() -> Value {
    json!({
        "service": "id",
        "client": "fizzmod",
        "entity": "profile",
        "id": "5d699c1ae8ebb95eaa24aca9",
        "event": "created"
    })
}

pub fn minimal_event() -> Value {
    json!({ "service": "id", "entity": "profile", "event": "created" })
}

pub fn sample_invocation() -> InvocationEvent {
    InvocationEvent::new(sample_event())
        .method("POST")
        .headers(json!({ "x-foo": "bar" }))
        .request_path("/api/listener/{entity}")
        .path_parameter("entity", "profile")
        .claim("janisAuth", r#"{"clientCode":"fizzmod"}"#)
}

// ============================================================================
// Test Listeners
// ============================================================================

/// Answers with the request as the listener saw it.
#[derive(Default)]
pub struct EchoListener;

impl Listener for EchoListener {
    async fn process(&self, ctx: &mut ListenerContext) -> Result<(), BoxError> {
        let body = json!({
            "method": ctx.method(),
            "endpoint": ctx.endpoint(),
            "headers": ctx.headers(),
            "session": ctx.session(),
        });
        ctx.set_body(body);
        Ok(())
    }
}

/// Requires `client` and `id` on every event.
#[derive(Default)]
pub struct StrictListener;

impl Listener for StrictListener {
    fn must_have_client(&self) -> bool {
        true
    }

    fn must_have_id(&self) -> bool {
        true
    }

    async fn process(&self, ctx: &mut ListenerContext) -> Result<(), BoxError> {
        let event = ctx.parse_event()?;
        ctx.set_code(201).set_body(json!({ "id": event.id }));
        Ok(())
    }
}

/// Accepts any payload.
#[derive(Default)]
pub struct LenientListener;

impl Listener for LenientListener {
    async fn validate(&self, _ctx: &mut ListenerContext) -> Result<(), BoxError> {
        Ok(())
    }

    async fn process(&self, ctx: &mut ListenerContext) -> Result<(), BoxError> {
        let data = ctx.data().cloned().unwrap_or(Value::Null);
        ctx.set_body(json!({ "received": data }));
        Ok(())
    }
}

/// Fails processing with a fixed message.
#[derive(Default)]
pub struct BoomListener;

impl Listener for BoomListener {
    async fn process(&self, _ctx: &mut ListenerContext) -> Result<(), BoxError> {
        Err("boom".into())
    }
}
