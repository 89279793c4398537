//! Commands for the Conversation context.

use storyworld_core::command::Command;
use storyworld_core::entity::Character;
use uuid::Uuid;

/// Command to start chatting with a character, replacing any active session.
#[derive(Debug, Clone)]
pub struct StartSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The character to talk to.
    pub character: Character,
}

/// Command to send a user message in the active session.
#[derive(Debug, Clone)]
pub struct SendMessage {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Message text as typed by the user.
    pub text: String,
}

impl Command for StartSession {
    fn command_type(&self) -> &'static str {
        "conversation.start_session"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

impl Command for SendMessage {
    fn command_type(&self) -> &'static str {
        "conversation.send_message"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
