//! # Neo
//!
//! A small polling chat bot framework.
//!
//! ## Overview
//!
//! A neo bot watches one room. It periodically fetches the messages posted
//! since its last position and hands each of them, except its own, to every
//! registered handler whose matcher accepts it. Handlers reply through a
//! [`Context`](framework::Context) scoped to the room.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌────────────┐     ┌──────────────────────────────┐
//! │ ChatClient  │────▶│ Bot        │────▶│ Registry                     │
//! │ (server)    │     │ (run loop) │     │  matcher ─▶ handler(Context) │
//! └─────────────┘     └────────────┘     │  matcher ─▶ handler(Context) │
//!        ▲                               └──────────────────────────────┘
//!        └────────────── send / upload / typing ◀─────┘
//! ```
//!
//! - **Core**: event model and the [`ChatClient`](core::ChatClient) capability
//! - **Framework**: registry, matchers, handlers and context
//! - **Runtime**: the bot, its polling loop, configuration and logging
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use neo::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), RuntimeError> {
//!     let config = load_config()?;
//!     let _guard = logging::init_from_config(&config.logging)?;
//!
//!     let bot = Bot::new(config, MyClient::connect)?;
//!     bot.register(body_regex("(?i)you").unwrap(), |ctx: Context| async move {
//!         ctx.set_typing(true).await?;
//!         ctx.send_text("Who, me?").await?;
//!         Ok(())
//!     });
//!
//!     bot.run_until_shutdown("!room:example.org").await
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config`: TOML configuration files (default)
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use neo_core as core;
pub use neo_framework as framework;
pub use neo_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use neo::prelude::*;
/// ```
pub mod prelude {
    pub use neo_runtime::prelude::*;

    // Core types for handlers and client implementations
    pub use neo_core::{
        BoxedClient, ChatClient, ContentUri, Credentials, Event, StreamToken, TransportError,
        TransportResult,
    };

    // Less common matchers and registry types
    pub use neo_framework::{HandlerId, IntoMatcher, on_msgtype};
}
