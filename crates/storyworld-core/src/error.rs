//! Domain error types.

use thiserror::Error;

/// A failed remote operation.
///
/// `Display` always renders the human-readable message only, so callers can
/// surface it to users verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The backend answered with a non-success HTTP status.
    #[error("{message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// The body's `error` field, or the per-operation fallback.
        message: String,
    },

    /// No response arrived (connection, TLS or body read failure).
    #[error("{message}")]
    Transport {
        /// Per-operation fallback message.
        message: String,
        /// Underlying transport error, for logs.
        detail: String,
    },

    /// A success response whose body is not the expected shape.
    #[error("{message}")]
    MalformedResponse {
        /// Per-operation fallback message.
        message: String,
        /// What was wrong with the body, for logs.
        detail: String,
    },
}

impl RequestError {
    /// Returns the user-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Rejected { message, .. }
            | Self::Transport { message, .. }
            | Self::MalformedResponse { message, .. } => message,
        }
    }
}

/// Top-level error for orchestration operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoryError {
    /// Local input was rejected before any network call.
    #[error("validation error: {0}")]
    Validation(String),

    /// The single request slot for this operation is occupied.
    #[error("{0} is already in flight")]
    Busy(String),

    /// The remote operation failed.
    #[error(transparent)]
    Request(#[from] RequestError),
}
