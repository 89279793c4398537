//! In-process HTTP stand-in for the AI backend.
//!
//! Binds an axum router to `127.0.0.1:0` and answers each route from a
//! scripted reply queue. The last reply of a queue repeats forever.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use serde_json::Value;

/// A canned backend answer.
#[derive(Debug, Clone)]
pub struct StubReply {
    status: StatusCode,
    body: String,
}

impl StubReply {
    /// A reply with a JSON body.
    #[must_use]
    pub fn json(status: StatusCode, body: &Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    /// A reply with an arbitrary body, e.g. an HTML error page.
    #[must_use]
    pub fn raw(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_owned(),
        }
    }
}

/// A request the stub received.
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    /// Route path, e.g. `/chat`.
    pub path: &'static str,
    /// Value of the `Content-Type` header, if any.
    pub content_type: Option<String>,
    /// Parsed JSON body (`Value::Null` if it was not JSON).
    pub body: Value,
}

/// A running stub backend. The server task lives until the runtime stops.
#[derive(Debug)]
pub struct StubBackend {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
}

impl StubBackend {
    /// Starts a stub serving `routes`, each a path and its reply queue.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot bind or a reply queue is empty.
    pub async fn spawn(routes: Vec<(&'static str, Vec<StubReply>)>) -> Self {
        let received: Arc<Mutex<Vec<ReceivedRequest>>> = Arc::default();

        let router = routes
            .into_iter()
            .fold(Router::new(), |router, (path, replies)| {
                assert!(!replies.is_empty(), "route {path} needs at least one reply");
                let replies = Arc::new(Mutex::new(VecDeque::from(replies)));
                let received = Arc::clone(&received);
                router.route(
                    path,
                    post(move |headers: HeaderMap, body: Bytes| {
                        let replies = Arc::clone(&replies);
                        let received = Arc::clone(&received);
                        async move {
                            received.lock().unwrap().push(ReceivedRequest {
                                path,
                                content_type: headers
                                    .get(CONTENT_TYPE)
                                    .and_then(|v| v.to_str().ok())
                                    .map(str::to_owned),
                                body: serde_json::from_slice(&body).unwrap_or(Value::Null),
                            });
                            let reply = {
                                let mut queue = replies.lock().unwrap();
                                if queue.len() > 1 {
                                    queue.pop_front().unwrap()
                                } else {
                                    queue.front().cloned().unwrap()
                                }
                            };
                            (reply.status, [(CONTENT_TYPE, "application/json")], reply.body)
                        }
                    }),
                )
            });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { addr, received }
    }

    /// Absolute URL of `path` on this stub.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Snapshot of every request received so far, in arrival order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.received.lock().unwrap().clone()
    }
}

/// Returns a loopback URL with nothing listening on it.
///
/// # Panics
///
/// Panics if a probe listener cannot bind.
pub async fn unreachable_url(path: &str) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}{path}")
}
