//! Environment-driven configuration.

use std::env;

use storyworld_transport::EndpointMap;

use crate::error::AppError;

/// Path to a JSON endpoint mapping file. Takes precedence over the
/// per-operation variables.
pub const ENDPOINTS_VAR: &str = "STORYWORLD_ENDPOINTS";
/// URL of the chat operation.
pub const CHAT_URL_VAR: &str = "STORYWORLD_CHAT_URL";
/// URL of the generate operation.
pub const GENERATE_URL_VAR: &str = "STORYWORLD_GENERATE_URL";
/// `true` or `1` selects JSON log output.
pub const LOG_JSON_VAR: &str = "STORYWORLD_LOG_JSON";

/// Start-up configuration. Loaded once and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Where each remote operation lives.
    pub endpoints: EndpointMap,
    /// Emit JSON logs instead of human-readable ones.
    pub log_json: bool,
}

impl AppConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_lookup`].
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when neither a mapping file nor both
    /// operation URLs are given, or a URL is unusable. Returns
    /// `AppError::Io` or `AppError::Json` when the mapping file cannot be
    /// read or parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let endpoints = match lookup(ENDPOINTS_VAR).filter(|path| !path.trim().is_empty()) {
            Some(path) => EndpointMap::from_file(path.trim())?,
            None => {
                let chat = lookup(CHAT_URL_VAR).ok_or_else(|| {
                    AppError::Config(format!("{ENDPOINTS_VAR} or {CHAT_URL_VAR} must be set"))
                })?;
                let generate = lookup(GENERATE_URL_VAR).ok_or_else(|| {
                    AppError::Config(format!(
                        "{ENDPOINTS_VAR} or {GENERATE_URL_VAR} must be set"
                    ))
                })?;
                EndpointMap::new(&chat, &generate)?
            }
        };

        let log_json = lookup(LOG_JSON_VAR).is_some_and(|value| {
            matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1")
        });

        Ok(Self {
            endpoints,
            log_json,
        })
    }
}
