//! Frozen time for transcript assertions.

use chrono::{DateTime, Utc};
use storyworld_core::clock::Clock;

/// Stamps every message with the same instant, so tests can compare whole
/// messages. Usually built from [`fixed_now`](crate::fixed_now).
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
