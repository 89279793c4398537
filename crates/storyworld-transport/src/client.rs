//! reqwest-backed implementation of `Transport`.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use storyworld_core::error::RequestError;
use storyworld_core::transport::{Operation, Transport};
use tracing::{debug, instrument, warn};

use crate::endpoints::EndpointMap;

/// Sends each operation as a single JSON `POST` to its mapped endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    endpoints: Arc<EndpointMap>,
}

impl HttpTransport {
    /// Builds a transport over `endpoints` with a fresh HTTP client.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest::Error` if the TLS backend cannot be initialised.
    pub fn new(endpoints: Arc<EndpointMap>) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { http, endpoints })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, payload), fields(operation = %operation))]
    async fn invoke(&self, operation: Operation, payload: Value) -> Result<Value, RequestError> {
        let url = self.endpoints.resolve(operation).clone();

        let response = self
            .http
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| transport_failure(operation, &e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| transport_failure(operation, &e))?;

        if !status.is_success() {
            let err = rejection(operation, status.as_u16(), &body);
            warn!(status = status.as_u16(), error = %err, "backend rejected request");
            return Err(err);
        }

        let value: Value = serde_json::from_slice(&body)
            .map_err(|e| operation.malformed(format!("success body is not JSON: {e}")))?;

        if let Some(request_id) = value.get("requestId").and_then(Value::as_str) {
            debug!(request_id, "backend request completed");
        }

        Ok(value)
    }
}

fn transport_failure(operation: Operation, err: &reqwest::Error) -> RequestError {
    warn!(error = %err, "request failed before a response was read");
    RequestError::Transport {
        message: operation.failure_message().to_owned(),
        detail: err.to_string(),
    }
}

/// Normalizes a non-success response. The body's string `error` field wins;
/// anything else falls back to the operation's generic message.
pub(crate) fn rejection(operation: Operation, status: u16, body: &[u8]) -> RequestError {
    let message = serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(Value::as_str)
                .filter(|msg| !msg.is_empty())
                .map(str::to_owned)
        })
        .unwrap_or_else(|| operation.failure_message().to_owned());

    RequestError::Rejected { status, message }
}
