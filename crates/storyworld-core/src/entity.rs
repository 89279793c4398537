//! Domain entities shared across bounded contexts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fallback `world` for characters generated without a world context.
pub const DEFAULT_WORLD_NAME: &str = "New world";

/// An AI-driven persona a user can chat with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    /// Unique identifier, assigned at creation.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Short description of role and temperament.
    pub description: String,
    /// Manner of speech and habits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality: Option<String>,
    /// Background story.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backstory: Option<String>,
    /// Avatar glyph (usually a single emoji).
    pub avatar: String,
    /// Name of the world the character belongs to.
    pub world: String,
    /// Notable traits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traits: Option<Vec<String>>,
}

/// A narrative setting that characters live in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct World {
    /// Unique identifier, assigned at creation.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Genre label, e.g. "Noir".
    pub genre: String,
    /// Denormalized character count. Not maintained automatically.
    pub characters: u32,
    /// Setting and atmosphere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setting: Option<String>,
    /// History and mythology.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lore: Option<String>,
    /// Recurring themes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub themes: Option<Vec<String>>,
}

/// Who authored a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

/// One entry of the visible message log. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Role of a model-context entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryRole {
    User,
    Assistant,
}

impl From<Sender> for HistoryRole {
    fn from(sender: Sender) -> Self {
        match sender {
            Sender::User => Self::User,
            Sender::Ai => Self::Assistant,
        }
    }
}

/// Role-tagged context entry sent to the remote chat operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: HistoryRole,
    pub content: String,
}

impl From<&Message> for HistoryEntry {
    fn from(message: &Message) -> Self {
        Self {
            role: message.sender.into(),
            content: message.text.clone(),
        }
    }
}
