//! Transport abstraction for the remote AI backend.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RequestError;

/// What a generate request produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Character,
    World,
    Story,
}

impl EntityKind {
    /// Wire name of the kind, as sent in the `type` field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::World => "world",
            Self::Story => "story",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Character reply to a user message.
    Chat,
    /// Prompt-based entity generation.
    Generate(EntityKind),
}

impl Operation {
    /// Name used to resolve the operation's endpoint.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Generate(_) => "generate",
        }
    }

    /// Message used when the backend gives no usable error of its own.
    #[must_use]
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Chat => "Failed to get AI response",
            Self::Generate(EntityKind::Character) => "Failed to generate character",
            Self::Generate(EntityKind::World) => "Failed to generate world",
            Self::Generate(EntityKind::Story) => "Failed to generate story",
        }
    }

    /// Builds a `MalformedResponse` error for this operation.
    #[must_use]
    pub fn malformed(self, detail: impl Into<String>) -> RequestError {
        RequestError::MalformedResponse {
            message: self.failure_message().to_owned(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chat => f.write_str("chat"),
            Self::Generate(kind) => write!(f, "generate:{kind}"),
        }
    }
}

/// Issues JSON requests against the remote backend.
///
/// Implementations make exactly one attempt per call: no retries and no
/// cancellation.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `payload` to the endpoint of `operation` and returns the parsed
    /// success body verbatim.
    async fn invoke(
        &self,
        operation: Operation,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value, RequestError>;
}
