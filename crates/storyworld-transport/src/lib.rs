//! Storyworld Transport — JSON-over-HTTP client for the AI backend.
//!
//! Resolves operation names through a static endpoint map loaded at start-up
//! and normalizes backend failures into `RequestError`.

pub mod client;
pub mod endpoints;

pub use client::HttpTransport;
pub use endpoints::{EndpointError, EndpointMap};
