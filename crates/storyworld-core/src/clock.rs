//! Time source for message timestamps.

use chrono::{DateTime, Utc};

/// Stamps the greeting, user messages and AI replies of a session.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time, used by `StoryWorld::from_config`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
