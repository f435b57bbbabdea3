//! Error types for the neo framework.

use thiserror::Error;

use crate::registry::HandlerId;
use neo_core::TransportError;

/// Errors returned by handler actions.
#[derive(Debug, Clone, Error)]
pub enum HandlerError {
    /// A context action failed at the transport.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Custom handler error.
    #[error("{0}")]
    Custom(String),
}

impl HandlerError {
    /// Creates a custom handler error.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }
}

/// Result type returned by handler actions.
pub type HandlerResult = Result<(), HandlerError>;

/// A handler failed while an event was being dispatched.
///
/// Dispatch stops at the first failing handler; handlers that would have run
/// after it are skipped for that event.
#[derive(Debug, Clone, Error)]
#[error("handler {handler_id} failed: {source}")]
pub struct DispatchError {
    /// The handler that returned the error.
    pub handler_id: HandlerId,
    /// The error returned by the handler.
    pub source: HandlerError,
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;
