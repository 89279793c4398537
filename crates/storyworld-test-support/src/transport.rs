//! Test transports — mock `Transport` implementations for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use storyworld_core::error::RequestError;
use storyworld_core::transport::{Operation, Transport};

/// A transport that records every call and replays a scripted list of
/// results, one per call, in order.
#[derive(Debug)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<Value, RequestError>>>,
    calls: Mutex<Vec<(Operation, Value)>>,
}

impl ScriptedTransport {
    /// Create a transport that answers calls with `script`, front to back.
    #[must_use]
    pub fn new(script: Vec<Result<Value, RequestError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Shorthand for a transport whose every scripted result is a success.
    #[must_use]
    pub fn replying(bodies: Vec<Value>) -> Self {
        Self::new(bodies.into_iter().map(Ok).collect())
    }

    /// Returns a snapshot of all `(operation, payload)` pairs received.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<(Operation, Value)> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of calls received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn invoke(&self, operation: Operation, payload: Value) -> Result<Value, RequestError> {
        self.calls.lock().unwrap().push((operation, payload));
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .expect("ScriptedTransport received more calls than scripted results")
    }
}

/// A transport that always fails as if the backend answered HTTP 500 with
/// `{"error": <message>}`.
#[derive(Debug)]
pub struct FailingTransport {
    message: String,
    calls: Mutex<usize>,
}

impl FailingTransport {
    /// Create a transport that fails every call with `message`.
    #[must_use]
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_owned(),
            calls: Mutex::new(0),
        }
    }

    /// Number of calls received so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Transport for FailingTransport {
    async fn invoke(&self, _operation: Operation, _payload: Value) -> Result<Value, RequestError> {
        *self.calls.lock().unwrap() += 1;
        Err(RequestError::Rejected {
            status: 500,
            message: self.message.clone(),
        })
    }
}
