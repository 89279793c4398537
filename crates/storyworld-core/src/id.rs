//! Identifier generation.
//!
//! Entities and messages never mint their own identifiers. A generator is
//! injected so production ids stay unique while tests stay deterministic.

use uuid::Uuid;

/// Source of process-unique identifiers.
pub trait IdGenerator: Send + Sync {
    /// Returns an identifier that was never returned before in this process.
    fn next_id(&self) -> Uuid;
}

/// Production generator backed by UUIDv7.
///
/// Ids sort by creation time (millisecond prefix) and carry 74 random bits,
/// so two ids minted in the same millisecond still differ.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeOrderedIds;

impl IdGenerator for TimeOrderedIds {
    fn next_id(&self) -> Uuid {
        Uuid::now_v7()
    }
}
