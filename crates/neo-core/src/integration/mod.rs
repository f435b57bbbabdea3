//! Integration layer - External system interfaces.
//!
//! This module contains the capability the framework uses to reach the chat
//! server. The framework never speaks the wire protocol itself; a concrete
//! client library is plugged in behind [`ChatClient`].

pub mod client;

pub use client::{BoxedClient, ChatClient, Credentials, Direction, MessagesPage};
