//! Mutex helpers shared by the in-memory state holders.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks `mutex`, recovering the data if a previous holder panicked.
///
/// Every critical section in this workspace is a single push, assignment
/// or read, so a poisoned guard never exposes a half-applied update.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
