//! The conversation session aggregate.

use serde::Serialize;
use serde_json::{Value, json};
use storyworld_core::clock::Clock;
use storyworld_core::entity::{Character, HistoryEntry, Message, Sender};
use storyworld_core::error::StoryError;
use storyworld_core::id::IdGenerator;
use uuid::Uuid;

/// Body of the remote chat operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub character_id: Uuid,
    pub character_name: String,
    pub character_description: String,
    pub message: String,
    /// Model context up to and including the user message being sent.
    pub conversation_history: Vec<HistoryEntry>,
}

impl ChatRequest {
    /// Renders the request as the JSON payload handed to the transport.
    #[must_use]
    pub fn to_payload(&self) -> Value {
        json!({
            "characterId": self.character_id,
            "characterName": self.character_name,
            "characterDescription": self.character_description,
            "message": self.message,
            "conversationHistory": self.conversation_history,
        })
    }
}

/// A user message that has been appended and now awaits its reply.
#[derive(Debug, Clone)]
pub struct PendingReply {
    /// Session that issued the request. A reply for any other session is
    /// discarded.
    pub session_id: Uuid,
    /// What to send to the chat operation.
    pub request: ChatRequest,
}

/// One chat with one character.
///
/// `messages` is the visible log. `history` mirrors it entry for entry with
/// `ai` mapped to `assistant`. Both only ever grow.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    id: Uuid,
    character: Character,
    messages: Vec<Message>,
    history: Vec<HistoryEntry>,
    awaiting_reply: bool,
}

impl ConversationSession {
    /// Starts a session whose log holds only the character's greeting.
    pub fn start(
        id: Uuid,
        character: Character,
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
    ) -> Self {
        let greeting = Self::greeting(&character);
        let mut session = Self {
            id,
            character,
            messages: Vec::new(),
            history: Vec::new(),
            awaiting_reply: false,
        };
        session.append(Sender::Ai, greeting, ids, clock);
        session
    }

    /// The synthesized opening line for `character`.
    #[must_use]
    pub fn greeting(character: &Character) -> String {
        format!(
            "Hi, I'm {}. {}. What shall we talk about?",
            character.name, character.description
        )
    }

    /// Appends the user's message and marks the session as awaiting a reply.
    ///
    /// Returns `Ok(None)` without touching state when `text` is blank.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Busy` if a reply is already outstanding.
    pub fn begin_send(
        &mut self,
        text: &str,
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
    ) -> Result<Option<PendingReply>, StoryError> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        if self.awaiting_reply {
            return Err(StoryError::Busy("chat request".to_owned()));
        }

        self.append(Sender::User, text.to_owned(), ids, clock);
        self.awaiting_reply = true;

        Ok(Some(PendingReply {
            session_id: self.id,
            request: ChatRequest {
                character_id: self.character.id,
                character_name: self.character.name.clone(),
                character_description: self.character.description.clone(),
                message: text.to_owned(),
                conversation_history: self.history.clone(),
            },
        }))
    }

    /// Appends the AI reply and clears the awaiting flag.
    pub fn complete_send(
        &mut self,
        reply: String,
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
    ) -> &Message {
        self.awaiting_reply = false;
        self.append(Sender::Ai, reply, ids, clock)
    }

    /// Clears the awaiting flag after a failed or abandoned request. The
    /// user message stays in the log.
    pub fn abort_send(&mut self) {
        self.awaiting_reply = false;
    }

    fn append(
        &mut self,
        sender: Sender,
        text: String,
        ids: &dyn IdGenerator,
        clock: &dyn Clock,
    ) -> &Message {
        let message = Message {
            id: ids.next_id(),
            sender,
            text,
            timestamp: clock.now(),
        };
        self.history.push(HistoryEntry::from(&message));
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    /// Session identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The character being talked to.
    #[must_use]
    pub fn character(&self) -> &Character {
        &self.character
    }

    /// The visible message log, in append order.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The model-context history, mirroring `messages`.
    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Whether a chat request is in flight.
    #[must_use]
    pub fn is_awaiting_reply(&self) -> bool {
        self.awaiting_reply
    }
}
