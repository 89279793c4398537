//! Command metadata shared by the generation and conversation handlers.

use uuid::Uuid;

/// A user-triggered request handled by one of the context handlers.
///
/// Handlers record both values on their tracing span, so a chat turn or a
/// generation can be followed from the facade call to the backend reply.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Dotted handler name, e.g. `conversation.send_message`.
    fn command_type(&self) -> &'static str;

    /// Fresh per facade call; never reused across commands.
    fn correlation_id(&self) -> Uuid;
}
