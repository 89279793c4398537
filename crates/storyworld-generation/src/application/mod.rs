//! Application layer for the Generation context.

pub mod command_handlers;
