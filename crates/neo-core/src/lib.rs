//! # Neo Core
//!
//! The core types of the neo bot framework.
//!
//! This crate provides the building blocks shared by every other layer: the
//! chat event model and the capability through which the framework reaches
//! the chat server.
//!
//! ## Architecture Layers
//!
//! ### Foundation Layer
//!
//! Core data types:
//! - **Events**: Immutable room events ([`Event`], [`MessageContent`])
//! - **Tokens**: Opaque server identifiers ([`StreamToken`], [`ContentUri`])
//! - **Errors**: Transport failures ([`TransportError`])
//!
//! ### Integration Layer
//!
//! External system interfaces:
//! - **Client Capability**: The pre-built chat client ([`ChatClient`])
//! - **Pagination**: [`MessagesPage`] and [`Direction`]
//!
//! ## Data Flow
//!
//! ```text
//! ┌─────────────┐     ┌────────────┐     ┌───────────┐
//! │ ChatClient  │────▶│    Bot     │────▶│  Handler  │
//! │  (server)   │     │ (run loop) │────▶│  Handler  │
//! └─────────────┘     └────────────┘     └───────────┘
//!        ▲                                     │
//!        └───────────── Context ◀──────────────┘
//! ```

// Architectural layers
pub mod foundation;
pub mod integration;

// Re-export foundation types
pub use foundation::{
    ContentUri, Event, EventId, MessageContent, ROOM_MESSAGE, StreamToken, TransportError,
    TransportResult,
};

// Re-export integration types
pub use integration::{BoxedClient, ChatClient, Credentials, Direction, MessagesPage};
