//! Test ids — deterministic `IdGenerator` implementation for tests.

use std::sync::atomic::{AtomicU64, Ordering};

use storyworld_core::id::IdGenerator;
use uuid::Uuid;

/// Hands out `Uuid::from_u128(1)`, `Uuid::from_u128(2)`, ... in call order.
#[derive(Debug)]
pub struct SequenceIdGenerator {
    next: AtomicU64,
}

impl SequenceIdGenerator {
    /// Create a generator whose first id is `Uuid::from_u128(1)`.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// Create a generator whose first id is `Uuid::from_u128(first)`.
    #[must_use]
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Number of the id the next call will return.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::SeqCst)
    }
}

impl Default for SequenceIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequenceIdGenerator {
    fn next_id(&self) -> Uuid {
        Uuid::from_u128(u128::from(self.next.fetch_add(1, Ordering::SeqCst)))
    }
}
