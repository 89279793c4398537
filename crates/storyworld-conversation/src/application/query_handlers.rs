//! Query handlers for the Conversation context.
//!
//! Read-only views over the active session for the UI layer.

use serde::Serialize;
use storyworld_core::entity::{Character, HistoryEntry, Message};
use uuid::Uuid;

use crate::domain::slot::SessionSlot;

/// Read-only view of the active conversation.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptView {
    /// The session identifier.
    pub session_id: Uuid,
    /// The character being talked to.
    pub character: Character,
    /// Visible message log, in append order.
    pub messages: Vec<Message>,
    /// Model context mirroring `messages`.
    pub history: Vec<HistoryEntry>,
    /// Whether a reply is outstanding; callers must not send while set.
    pub awaiting_reply: bool,
}

/// Returns a snapshot of the active conversation, if any.
#[must_use]
pub fn get_transcript(slot: &SessionSlot) -> Option<TranscriptView> {
    slot.read(|active| {
        active.map(|session| TranscriptView {
            session_id: session.id(),
            character: session.character().clone(),
            messages: session.messages().to_vec(),
            history: session.history().to_vec(),
            awaiting_reply: session.is_awaiting_reply(),
        })
    })
}

/// Whether the active session has a chat request in flight.
#[must_use]
pub fn is_awaiting_reply(slot: &SessionSlot) -> bool {
    slot.read(|active| active.is_some_and(|session| session.is_awaiting_reply()))
}
