//! Storyworld — Conversation Session bounded context.
//!
//! Owns the message log and the mirrored model-context history of the one
//! active chat, and drives the user-message / AI-reply round trip.

pub mod application;
pub mod domain;
