//! Storyworld — composition root.
//!
//! Wires the store, the HTTP transport and the context handlers into a
//! single [`StoryWorld`](world::StoryWorld) object with an explicit
//! lifecycle, and owns start-up configuration and tracing set-up.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod world;
