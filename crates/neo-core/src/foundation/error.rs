//! Unified error types for the neo core.
//!
//! This module provides the error type reported by [`ChatClient`](crate::ChatClient)
//! implementations. Handler and dispatch errors are defined in `neo-framework`,
//! runtime errors in `neo-runtime`.

use thiserror::Error;

// =============================================================================
// Transport Errors
// =============================================================================

/// Errors that can occur while talking to the chat server.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// The client could not be constructed or could not reach the server.
    #[error("connection failed: {url} - {reason}")]
    ConnectionFailed {
        /// The home server URL that failed.
        url: String,
        /// Reason for failure.
        reason: String,
    },

    /// The server rejected the access token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The server answered with an error code.
    #[error("server error ({errcode}): {message}")]
    Server {
        /// Protocol error code, e.g. `M_FORBIDDEN`.
        errcode: String,
        /// Human readable error message.
        message: String,
    },

    /// Message send failed.
    #[error("failed to send message: {0}")]
    SendFailed(String),

    /// Media upload failed.
    #[error("failed to upload media from {url}: {reason}")]
    UploadFailed {
        /// The remote resource that was being uploaded.
        url: String,
        /// Reason for failure.
        reason: String,
    },

    /// Response could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Invalid client configuration.
    #[error("invalid transport configuration: {0}")]
    InvalidConfig(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),
}

impl TransportError {
    /// Creates a connection error for the given server URL.
    pub fn connection(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConnectionFailed {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates a server error from a protocol error code and message.
    pub fn server(errcode: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Server {
            errcode: errcode.into(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;
