//! Error types for Horizon Autocomplete core primitives.

use std::error::Error as StdError;

/// Errors reported by caller-supplied asynchronous functions.
///
/// Async filter functions and hooks return this type. The engine treats the
/// two families differently: [`AsyncError::Cancelled`] is the expected outcome
/// of a superseded request and is discarded without a trace above `trace`
/// level, everything else is logged and otherwise swallowed.
#[derive(Debug, thiserror::Error)]
pub enum AsyncError {
    /// The request observed its cancellation token and gave up.
    #[error("async request was cancelled")]
    Cancelled,

    /// The request failed with a plain message.
    #[error("async request failed: {message}")]
    Failed {
        /// Human readable failure description.
        message: String,
    },

    /// The request failed with an underlying error.
    #[error("async request failed: {0}")]
    Source(#[source] Box<dyn StdError + Send + Sync>),
}

impl AsyncError {
    /// Create a failure from a message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Wrap an arbitrary error.
    pub fn source(err: impl StdError + Send + Sync + 'static) -> Self {
        Self::Source(Box::new(err))
    }

    /// Whether this error represents a cancelled request.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Errors that can occur with the async runtime.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AsyncRuntimeError {
    /// The runtime has already been initialized.
    #[error("Async runtime already initialized")]
    AlreadyInitialized,
    /// Failed to create the runtime.
    #[error("Failed to create async runtime: {0}")]
    CreationFailed(String),
}

/// A specialized Result type for core operations.
pub type Result<T> = std::result::Result<T, AsyncRuntimeError>;
