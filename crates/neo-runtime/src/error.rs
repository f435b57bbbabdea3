//! Runtime error types.

use std::fmt;

use thiserror::Error;

use crate::config::ConfigError;
use crate::logging::LoggingError;
use neo_core::TransportError;
use neo_framework::DispatchError;

/// The startup step that failed before the polling loop was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupStage {
    /// Initial sync to obtain a stream position.
    Sync,
    /// Display name lookup.
    DisplayName,
    /// Announcement message.
    Announce,
}

impl fmt::Display for StartupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sync => "initial sync",
            Self::DisplayName => "display name lookup",
            Self::Announce => "announcement",
        })
    }
}

/// Errors that can occur during runtime operations.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The global logger could not be installed.
    #[error(transparent)]
    Logging(#[from] LoggingError),

    /// The chat client could not be constructed.
    #[error("Failed to construct chat client: {0}")]
    Connect(#[source] TransportError),

    /// A startup step failed.
    #[error("Startup failed during {stage}: {source}")]
    Startup {
        stage: StartupStage,
        #[source]
        source: TransportError,
    },

    /// Fetching messages kept failing after all retries.
    #[error("Failed to fetch messages after {attempts} attempts: {source}")]
    Fetch {
        attempts: u32,
        #[source]
        source: TransportError,
    },

    /// A handler failed.
    #[error(transparent)]
    Handler(#[from] DispatchError),

    /// The polling task panicked.
    #[error("Polling task failed: {0}")]
    TaskFailed(String),

    /// Shutdown signal handlers could not be installed.
    #[error("Failed to listen for shutdown signals: {0}")]
    Signal(#[from] std::io::Error),
}

impl RuntimeError {
    /// Creates a startup error for the given stage.
    pub fn startup(stage: StartupStage, source: TransportError) -> Self {
        Self::Startup { stage, source }
    }
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
