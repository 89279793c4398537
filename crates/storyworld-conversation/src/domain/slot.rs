//! Holder of the single active session.

use std::sync::Mutex;

use storyworld_core::sync::lock;
use uuid::Uuid;

use super::session::ConversationSession;

/// At most one active conversation.
///
/// The lock is only ever held for a synchronous read or mutation, never
/// across a network call, so the awaiting flag stays observable while a
/// reply is outstanding.
#[derive(Debug, Default)]
pub struct SessionSlot {
    active: Mutex<Option<ConversationSession>>,
}

impl SessionSlot {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `session`, returning the one it replaced.
    pub fn replace(&self, session: ConversationSession) -> Option<ConversationSession> {
        lock(&self.active).replace(session)
    }

    /// Removes the active session, if any.
    pub fn clear(&self) -> Option<ConversationSession> {
        lock(&self.active).take()
    }

    /// Runs `f` against the active session.
    pub fn read<R>(&self, f: impl FnOnce(Option<&ConversationSession>) -> R) -> R {
        f(lock(&self.active).as_ref())
    }

    /// Runs `f` against the active session, mutably.
    pub fn update<R>(&self, f: impl FnOnce(Option<&mut ConversationSession>) -> R) -> R {
        f(lock(&self.active).as_mut())
    }

    /// Runs `f` only if the active session is still `session_id`.
    pub fn update_if_current<R>(
        &self,
        session_id: Uuid,
        f: impl FnOnce(&mut ConversationSession) -> R,
    ) -> Option<R> {
        lock(&self.active)
            .as_mut()
            .filter(|session| session.id() == session_id)
            .map(f)
    }
}
