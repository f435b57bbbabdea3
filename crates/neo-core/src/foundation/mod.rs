//! Foundation layer - Core data types.
//!
//! This module contains the fundamental building blocks of the neo framework:
//! - The chat [`Event`] model and its content
//! - Opaque server tokens ([`StreamToken`], [`ContentUri`])
//! - Transport error types

pub mod error;
pub mod event;

pub use error::{TransportError, TransportResult};
pub use event::{ContentUri, Event, EventId, MessageContent, ROOM_MESSAGE, StreamToken};
