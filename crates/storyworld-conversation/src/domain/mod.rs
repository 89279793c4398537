//! Domain layer for the Conversation context.

pub mod commands;
pub mod session;
pub mod slot;
