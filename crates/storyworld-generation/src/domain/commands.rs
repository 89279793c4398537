//! Commands for the Generation context.

use storyworld_core::command::Command;
use storyworld_core::transport::EntityKind;
use uuid::Uuid;

/// Command to generate a new entity from a prompt.
#[derive(Debug, Clone)]
pub struct GenerateEntity {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// What to generate.
    pub kind: EntityKind,
    /// Free-text description from the user.
    pub prompt: String,
    /// Name or description of the world to generate within. Ignored for
    /// worlds.
    pub world_context: Option<String>,
}

impl GenerateEntity {
    /// Returns the world context if it is present and not blank.
    #[must_use]
    pub fn effective_world_context(&self) -> Option<&str> {
        if self.kind == EntityKind::World {
            return None;
        }
        self.world_context
            .as_deref()
            .map(str::trim)
            .filter(|ctx| !ctx.is_empty())
    }
}

impl Command for GenerateEntity {
    fn command_type(&self) -> &'static str {
        match self.kind {
            EntityKind::Character => "generation.generate_character",
            EntityKind::World => "generation.generate_world",
            EntityKind::Story => "generation.generate_story",
        }
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
