//! Shared helpers for the end-to-end tests.
#![allow(dead_code)]

use std::sync::Arc;

use storyworld_app::world::StoryWorld;
use storyworld_test_support::{FixedClock, SequenceIdGenerator, StubBackend, fixed_now};
use storyworld_transport::{EndpointMap, HttpTransport};

/// A `StoryWorld` talking real HTTP to `backend`'s `/chat` and `/generate`
/// routes, with a fixed clock and sequential ids.
pub fn world_for(backend: &StubBackend) -> StoryWorld {
    let endpoints = EndpointMap::new(&backend.url("/chat"), &backend.url("/generate")).unwrap();
    let transport = HttpTransport::new(Arc::new(endpoints)).unwrap();
    StoryWorld::new(
        Arc::new(transport),
        Arc::new(FixedClock(fixed_now())),
        Arc::new(SequenceIdGenerator::new()),
    )
}
