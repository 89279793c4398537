//! Storyworld Core — shared domain abstractions.
//!
//! This crate defines the entities, seams and error types that every
//! bounded context depends on. It contains no infrastructure code.

pub mod clock;
pub mod command;
pub mod entity;
pub mod error;
pub mod id;
pub mod sync;
pub mod transport;
