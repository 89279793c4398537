//! Storyworld — start-up error types.

use storyworld_transport::EndpointError;
use thiserror::Error;

/// Errors raised while assembling a [`StoryWorld`](crate::world::StoryWorld).
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or a value is unusable.
    #[error("configuration error: {0}")]
    Config(String),

    /// A configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file is not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<EndpointError> for AppError {
    fn from(err: EndpointError) -> Self {
        match err {
            EndpointError::Io(e) => Self::Io(e),
            EndpointError::Json(e) => Self::Json(e),
            other => Self::Config(other.to_string()),
        }
    }
}
