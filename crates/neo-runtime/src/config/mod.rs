//! Configuration module for the neo runtime.
//!
//! Layered loading (defaults, files, environment) of the bot credentials,
//! polling settings, fetch retry policy and logging options, plus validation.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    DEFAULT_PAGE_SIZE, DEFAULT_POLLING_INTERVAL, LogFormat, LogLevel, LogOutput, LogRotation,
    LoggingConfig, NeoConfig, RetryConfig, SpanEventConfig,
};
pub use validation::{MAX_PAGE_SIZE, validate_config};
