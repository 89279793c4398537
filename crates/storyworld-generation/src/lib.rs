//! Storyworld — Generation bounded context.
//!
//! Turns a free-text prompt into a typed character, world or story draft
//! via the remote generate operation.

pub mod application;
pub mod domain;
