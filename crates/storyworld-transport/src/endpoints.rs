//! Static operation-name to URL mapping.

use std::path::Path;

use reqwest::Url;
use serde::Deserialize;
use storyworld_core::transport::Operation;
use thiserror::Error;

/// Errors raised while loading an endpoint map.
#[derive(Debug, Error)]
pub enum EndpointError {
    /// The mapping has no URL for a required operation.
    #[error("no endpoint configured for operation `{0}`")]
    Missing(&'static str),

    /// A URL could not be parsed.
    #[error("invalid URL for operation `{operation}`: {reason}")]
    InvalidUrl {
        /// Operation name.
        operation: &'static str,
        /// Parser message.
        reason: String,
    },

    /// A URL uses a scheme other than http or https.
    #[error("unsupported scheme `{scheme}` for operation `{operation}`")]
    UnsupportedScheme {
        /// Operation name.
        operation: &'static str,
        /// The offending scheme.
        scheme: String,
    },

    /// The mapping file is not valid JSON.
    #[error("endpoint map is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The mapping file could not be read.
    #[error("failed to read endpoint map: {0}")]
    Io(#[from] std::io::Error),
}

/// Mapping file layout. Unknown keys are ignored.
#[derive(Debug, Deserialize)]
struct RawEndpoints {
    #[serde(alias = "ai-chat")]
    chat: Option<String>,
    #[serde(alias = "ai-generate")]
    generate: Option<String>,
}

/// Resolved endpoints for every remote operation. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointMap {
    chat: Url,
    generate: Url,
}

impl EndpointMap {
    /// Builds a map from explicit chat and generate URLs.
    ///
    /// # Errors
    ///
    /// Returns `EndpointError::InvalidUrl` or `EndpointError::UnsupportedScheme`
    /// if either URL is unusable.
    pub fn new(chat: &str, generate: &str) -> Result<Self, EndpointError> {
        Ok(Self {
            chat: parse_endpoint("chat", chat)?,
            generate: parse_endpoint("generate", generate)?,
        })
    }

    /// Parses a JSON object such as `{"chat": "...", "generate": "..."}`.
    /// The keys `ai-chat` and `ai-generate` are accepted as aliases.
    ///
    /// # Errors
    ///
    /// Returns `EndpointError::Json` for malformed JSON,
    /// `EndpointError::Missing` when an operation has no entry, or a URL
    /// error for unusable values.
    pub fn from_json_str(json: &str) -> Result<Self, EndpointError> {
        let raw: RawEndpoints = serde_json::from_str(json)?;
        let chat = raw.chat.ok_or(EndpointError::Missing("chat"))?;
        let generate = raw.generate.ok_or(EndpointError::Missing("generate"))?;
        Self::new(&chat, &generate)
    }

    /// Reads and parses a mapping file.
    ///
    /// # Errors
    ///
    /// Returns `EndpointError::Io` if the file cannot be read, otherwise the
    /// errors of [`EndpointMap::from_json_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EndpointError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Returns the URL serving `operation`.
    #[must_use]
    pub fn resolve(&self, operation: Operation) -> &Url {
        match operation {
            Operation::Chat => &self.chat,
            Operation::Generate(_) => &self.generate,
        }
    }
}

fn parse_endpoint(operation: &'static str, raw: &str) -> Result<Url, EndpointError> {
    let url = Url::parse(raw.trim()).map_err(|e| EndpointError::InvalidUrl {
        operation,
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(EndpointError::UnsupportedScheme {
            operation,
            scheme: other.to_owned(),
        }),
    }
}
