//! Neo Runtime - the run loop of the neo bot framework.
//!
//! This crate provides:
//! - [`Bot`]: configuration, chat client and handler registry in one place
//! - The polling loop that turns room history into dispatched events
//! - Per-room [`Session`] state (stream position and counters)
//! - Layered configuration loading and validation
//! - Logging configuration
//!
//! ```ignore
//! use neo_runtime::prelude::*;
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
//!     // Run until Ctrl+C
//!     bot.run_until_shutdown("!room:example.org").await
//! }
//! ```

pub mod bot;
pub mod config;
pub mod error;
pub mod logging;
mod poller;
pub mod session;

// Re-exports
pub use bot::{Bot, announcement};
pub use config::{ConfigError, ConfigLoader, ConfigResult, NeoConfig, load_config};
pub use error::{RuntimeError, RuntimeResult, StartupStage};
pub use logging::{LoggingBuilder, LoggingError, LoggingGuard};
pub use session::Session;

pub use tokio_util::sync::CancellationToken;

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::logging;
    pub use crate::{
        Bot, CancellationToken, ConfigLoader, NeoConfig, RuntimeError, RuntimeResult,
        load_config,
    };
    pub use neo_framework::{
        Context, HandlerError, HandlerResult, Matcher, any, body_contains, body_regex,
        body_starts_with, from_sender, on_message,
    };
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
