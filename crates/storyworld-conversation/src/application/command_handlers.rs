//! Command handlers for the Conversation context.
//!
//! Sending runs in three steps: append the user message under the slot lock,
//! await the remote reply with the lock released, then append the reply if
//! the issuing session is still active.

use serde_json::Value;
use storyworld_core::clock::Clock;
use storyworld_core::command::Command;
use storyworld_core::entity::Message;
use storyworld_core::error::{RequestError, StoryError};
use storyworld_core::id::IdGenerator;
use storyworld_core::transport::{Operation, Transport};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::commands::{SendMessage, StartSession};
use crate::domain::session::{ConversationSession, PendingReply};
use crate::domain::slot::SessionSlot;

/// Clears the awaiting flag of the issuing session if the send future is
/// dropped before the reply is applied.
struct AwaitingReply<'a> {
    slot: &'a SessionSlot,
    session_id: Uuid,
    armed: bool,
}

impl<'a> AwaitingReply<'a> {
    fn new(slot: &'a SessionSlot, session_id: Uuid) -> Self {
        Self {
            slot,
            session_id,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for AwaitingReply<'_> {
    fn drop(&mut self) {
        if self.armed {
            debug!(session_id = %self.session_id, "send abandoned before reply arrived");
            self.slot
                .update_if_current(self.session_id, ConversationSession::abort_send);
        }
    }
}

/// Handles the `StartSession` command: replaces the active session with a
/// fresh one for the command's character.
///
/// A reply still outstanding for the replaced session is discarded when it
/// arrives. The request itself is not cancelled.
#[instrument(
    skip_all,
    fields(correlation_id = %command.correlation_id, character_id = %command.character.id)
)]
pub fn handle_start_session(
    command: &StartSession,
    slot: &SessionSlot,
    ids: &dyn IdGenerator,
    clock: &dyn Clock,
) -> Uuid {
    let session = ConversationSession::start(ids.next_id(), command.character.clone(), ids, clock);
    let session_id = session.id();

    if let Some(previous) = slot
        .replace(session)
        .filter(ConversationSession::is_awaiting_reply)
    {
        info!(previous_session_id = %previous.id(), "replaced session with a reply outstanding");
    }

    info!(command = command.command_type(), %session_id, "session started");
    session_id
}

/// Handles the `SendMessage` command.
///
/// Returns the appended AI message, or `Ok(None)` when nothing was sent
/// (blank text, no active session) or the reply was discarded because the
/// session was replaced meanwhile.
///
/// # Errors
///
/// Returns `StoryError::Busy` if a reply is already outstanding and
/// `StoryError::Request` if the chat operation fails. The user message is
/// kept in the log either way.
#[instrument(skip_all, fields(correlation_id = %command.correlation_id))]
pub async fn handle_send_message(
    command: &SendMessage,
    slot: &SessionSlot,
    transport: &dyn Transport,
    ids: &dyn IdGenerator,
    clock: &dyn Clock,
) -> Result<Option<Message>, StoryError> {
    let pending = slot.update(|active| match active {
        Some(session) => session.begin_send(&command.text, ids, clock),
        None => {
            debug!("no active session; message ignored");
            Ok(None)
        }
    })?;
    let Some(PendingReply {
        session_id,
        request,
    }) = pending
    else {
        return Ok(None);
    };

    info!(command = command.command_type(), %session_id, "requesting reply");

    let awaiting = AwaitingReply::new(slot, session_id);
    let result = transport
        .invoke(Operation::Chat, request.to_payload())
        .await
        .and_then(|body| reply_text(&body));
    awaiting.disarm();

    let text = match result {
        Ok(text) => text,
        Err(err) => {
            slot.update_if_current(session_id, ConversationSession::abort_send);
            warn!(%session_id, error = %err, "chat request failed");
            return Err(err.into());
        }
    };

    match slot.update_if_current(session_id, |session| {
        session.complete_send(text, ids, clock).clone()
    }) {
        Some(reply) => {
            info!(%session_id, "reply appended");
            Ok(Some(reply))
        }
        None => {
            debug!(%session_id, "session replaced while awaiting reply; reply discarded");
            Ok(None)
        }
    }
}

fn reply_text(body: &Value) -> Result<String, RequestError> {
    body.get("message")
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| Operation::Chat.malformed("response has no string `message`"))
}
