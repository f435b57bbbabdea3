//! # Neo Framework
//!
//! Handler-side building blocks for neo bots.
//!
//! This layer provides:
//! - [`Registry`] mapping generated [`HandlerId`]s to (matcher, handler) pairs
//! - Matcher system for deciding which events a handler sees
//! - [`Context`] with the actions a handler can take in its room
//! - Convenience matcher builders (`on_message`, `body_contains`, etc.)
//!
//! The framework is transport agnostic: everything talks to the chat server
//! through [`neo_core::ChatClient`].

pub mod context;
pub mod error;
pub mod handler;
pub mod matcher;
pub mod matcher_builders;
pub mod registry;

#[cfg(test)]
mod testing;

pub use context::{Context, TYPING_TIMEOUT};
pub use error::{DispatchError, DispatchResult, HandlerError, HandlerResult};
pub use handler::{BoxedHandler, Handler, into_handler};
pub use matcher::{CheckFn, IntoMatcher, Matcher};
pub use matcher_builders::{
    any, body_contains, body_matches, body_regex, body_starts_with, from_sender, on_message,
    on_msgtype,
};
pub use registry::{HandlerId, Registry};
