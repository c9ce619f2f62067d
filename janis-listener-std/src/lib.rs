//! # janis-listener-std
//!
//! Runtime pieces for the event listener framework.
//!
//! This crate provides:
//! - **Dispatching**: [`Dispatcher`](dispatcher::Dispatcher), which drives one
//!   request through a listener
//! - **Serverless entry point**: [`ServerlessHandler`](serverless::ServerlessHandler)
//! - **Testing utilities**: recording serializers and spy listeners

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use janis_listener_core;

// Modules
pub mod dispatcher;
pub mod serverless;
pub mod testing;
