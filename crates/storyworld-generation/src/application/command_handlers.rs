//! Command handlers for the Generation context.
//!
//! Handlers validate the prompt, call the remote generate operation and map
//! the answer into an entity. They never touch the entity store: the caller
//! inserts the returned entity exactly once.

use storyworld_core::command::Command;
use storyworld_core::error::StoryError;
use storyworld_core::id::IdGenerator;
use storyworld_core::transport::{Operation, Transport};
use tracing::{info, instrument};

use crate::domain::commands::GenerateEntity;
use crate::domain::content::{self, GeneratedEntity};

/// Handles the `GenerateEntity` command.
///
/// A blank prompt is rejected before any network call.
///
/// # Errors
///
/// Returns `StoryError::Validation` for a blank prompt and
/// `StoryError::Request` if the transport fails or the response is malformed.
#[instrument(
    skip_all,
    fields(correlation_id = %command.correlation_id, kind = %command.kind)
)]
pub async fn handle_generate(
    command: &GenerateEntity,
    transport: &dyn Transport,
    ids: &dyn IdGenerator,
) -> Result<GeneratedEntity, StoryError> {
    if command.prompt.trim().is_empty() {
        return Err(StoryError::Validation("prompt must not be empty".to_owned()));
    }

    let world_context = command.effective_world_context();
    let body = content::request_body(command.kind, &command.prompt, world_context);

    info!(command = command.command_type(), "requesting generation");

    let response = transport
        .invoke(Operation::Generate(command.kind), body)
        .await?;
    let entity = content::map_response(command.kind, response, ids, world_context)?;

    info!("generation completed");

    Ok(entity)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use storyworld_core::error::{RequestError, StoryError};
    use storyworld_core::transport::{EntityKind, Operation};
    use storyworld_test_support::{FailingTransport, ScriptedTransport, SequenceIdGenerator};
    use uuid::Uuid;

    use crate::application::command_handlers::handle_generate;
    use crate::domain::commands::GenerateEntity;
    use crate::domain::content::GeneratedEntity;

    fn command(kind: EntityKind, prompt: &str, world_context: Option<&str>) -> GenerateEntity {
        GenerateEntity {
            correlation_id: Uuid::new_v4(),
            kind,
            prompt: prompt.to_owned(),
            world_context: world_context.map(str::to_owned),
        }
    }

    #[tokio::test]
    async fn test_handle_generate_world_sends_request_and_maps_content() {
        // Arrange
        let transport = ScriptedTransport::replying(vec![json!({
            "content": { "name": "Rain City", "description": "...", "genre": "Noir" }
        })]);
        let ids = SequenceIdGenerator::new();
        let command = command(EntityKind::World, "a city of rain", Some("ignored"));

        // Act
        let entity = handle_generate(&command, &transport, &ids).await.unwrap();

        // Assert
        let GeneratedEntity::World(world) = entity else {
            panic!("expected a world");
        };
        assert_eq!(world.name, "Rain City");
        assert_eq!(world.characters, 0);

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, Operation::Generate(EntityKind::World));
        assert_eq!(
            calls[0].1,
            json!({ "type": "world", "prompt": "a city of rain" })
        );
    }

    #[tokio::test]
    async fn test_handle_generate_character_forwards_trimmed_world_context() {
        // Arrange
        let transport = ScriptedTransport::replying(vec![json!({
            "content": { "name": "Yuki", "description": "A lone hacker", "avatar": "🧑‍💻" }
        })]);
        let ids = SequenceIdGenerator::new();
        let command = command(EntityKind::Character, "a hacker", Some("  Cyber Tokyo  "));

        // Act
        let entity = handle_generate(&command, &transport, &ids).await.unwrap();

        // Assert
        let GeneratedEntity::Character(character) = entity else {
            panic!("expected a character");
        };
        assert_eq!(character.world, "Cyber Tokyo");
        assert_eq!(transport.calls()[0].1["worldContext"], "Cyber Tokyo");
    }

    #[tokio::test]
    async fn test_handle_generate_treats_blank_world_context_as_absent() {
        // Arrange
        let transport = ScriptedTransport::replying(vec![json!({
            "content": { "name": "Ren", "description": "Seer", "avatar": "🔮" }
        })]);
        let ids = SequenceIdGenerator::new();
        let command = command(EntityKind::Character, "a seer", Some("   "));

        // Act
        let entity = handle_generate(&command, &transport, &ids).await.unwrap();

        // Assert
        let GeneratedEntity::Character(character) = entity else {
            panic!("expected a character");
        };
        assert_eq!(character.world, "New world");
        assert!(transport.calls()[0].1.get("worldContext").is_none());
    }

    #[tokio::test]
    async fn test_handle_generate_rejects_blank_prompt_without_network_call() {
        // Arrange
        let transport = ScriptedTransport::new(vec![]);
        let ids = SequenceIdGenerator::new();

        for prompt in ["", "   ", "\n\t"] {
            // Act
            let result =
                handle_generate(&command(EntityKind::Character, prompt, None), &transport, &ids)
                    .await;

            // Assert
            assert!(matches!(result, Err(StoryError::Validation(_))));
        }
        assert_eq!(transport.call_count(), 0);
        assert_eq!(ids.peek(), 1);
    }

    #[tokio::test]
    async fn test_handle_generate_propagates_transport_failure_unchanged() {
        // Arrange
        let transport = FailingTransport::new("quota exceeded");
        let ids = SequenceIdGenerator::new();
        let command = command(EntityKind::Story, "a heist", Some("Rain City"));

        // Act
        let result = handle_generate(&command, &transport, &ids).await;

        // Assert
        assert_eq!(
            result,
            Err(StoryError::Request(RequestError::Rejected {
                status: 500,
                message: "quota exceeded".to_owned(),
            }))
        );
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_handle_generate_assigns_distinct_ids_across_calls() {
        // Arrange
        let content = json!({ "content": { "name": "A", "description": "B", "genre": "C" } });
        let transport = ScriptedTransport::replying(vec![content.clone(), content]);
        let ids = SequenceIdGenerator::new();
        let command = command(EntityKind::World, "twin worlds", None);

        // Act
        let first = handle_generate(&command, &transport, &ids).await.unwrap();
        let second = handle_generate(&command, &transport, &ids).await.unwrap();

        // Assert
        match (first, second) {
            (GeneratedEntity::World(a), GeneratedEntity::World(b)) => assert_ne!(a.id, b.id),
            other => panic!("expected two worlds, got {other:?}"),
        }
    }
}
