//! Shared test mocks and utilities for the Storyworld conversation engine.

mod clock;
mod fixtures;
mod ids;
mod stub_backend;
mod transport;

pub use axum::http::StatusCode;
pub use clock::FixedClock;
pub use fixtures::{fixed_now, sample_character};
pub use ids::SequenceIdGenerator;
pub use stub_backend::{ReceivedRequest, StubBackend, StubReply, unreachable_url};
pub use transport::{FailingTransport, ScriptedTransport};
