//! Wire shapes of the generate operation and their mapping into entities.
//!
//! Required fields must be present with the right type, otherwise the whole
//! response is rejected. Optional fields of the wrong type are dropped.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};
use storyworld_core::entity::{Character, DEFAULT_WORLD_NAME, World};
use storyworld_core::error::RequestError;
use storyworld_core::id::IdGenerator;
use storyworld_core::transport::{EntityKind, Operation};
use tracing::warn;

/// Result of a successful generation, keyed by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratedEntity {
    /// A new character with a fresh id.
    Character(Character),
    /// A new world with a fresh id and zero characters.
    World(World),
    /// A story draft. Its schema belongs to the caller, so it stays raw JSON.
    Story(Value),
}

impl GeneratedEntity {
    /// The kind of entity produced.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Character(_) => EntityKind::Character,
            Self::World(_) => EntityKind::World,
            Self::Story(_) => EntityKind::Story,
        }
    }
}

/// Character fields returned in `content`.
#[derive(Debug, Deserialize)]
struct CharacterContent {
    name: String,
    description: String,
    avatar: String,
    #[serde(default, deserialize_with = "lenient")]
    personality: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    backstory: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    traits: Option<Vec<String>>,
}

/// World fields returned in `content`.
#[derive(Debug, Deserialize)]
struct WorldContent {
    name: String,
    description: String,
    genre: String,
    #[serde(default, deserialize_with = "lenient")]
    setting: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    lore: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    themes: Option<Vec<String>>,
}

/// Deserializes an optional field, treating a wrongly typed value as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    match serde_json::from_value(value) {
        Ok(field) => Ok(field),
        Err(e) => {
            warn!(error = %e, "dropping malformed optional field from generated content");
            Ok(None)
        }
    }
}

/// Builds the request body for the generate operation. `worldContext` is
/// omitted entirely when absent.
#[must_use]
pub fn request_body(kind: EntityKind, prompt: &str, world_context: Option<&str>) -> Value {
    let mut body = json!({
        "type": kind.as_str(),
        "prompt": prompt,
    });
    if let Some(ctx) = world_context {
        body["worldContext"] = Value::String(ctx.to_owned());
    }
    body
}

/// Extracts `content` from a generate response and maps it into `kind`.
///
/// # Errors
///
/// Returns `RequestError::MalformedResponse` if `content` is missing, is not
/// an object, or lacks a required field.
pub fn map_response(
    kind: EntityKind,
    mut response: Value,
    ids: &dyn IdGenerator,
    world_context: Option<&str>,
) -> Result<GeneratedEntity, RequestError> {
    let operation = Operation::Generate(kind);
    let content = match response.get_mut("content").map(Value::take) {
        Some(content @ Value::Object(_)) => content,
        Some(other) => {
            return Err(operation.malformed(format!(
                "`content` must be an object, got {}",
                json_type(&other)
            )));
        }
        None => return Err(operation.malformed("response has no `content`")),
    };

    match kind {
        EntityKind::Character => into_character(content, ids, world_context)
            .map(GeneratedEntity::Character)
            .map_err(|e| operation.malformed(e.to_string())),
        EntityKind::World => into_world(content, ids)
            .map(GeneratedEntity::World)
            .map_err(|e| operation.malformed(e.to_string())),
        EntityKind::Story => Ok(GeneratedEntity::Story(content)),
    }
}

fn into_character(
    content: Value,
    ids: &dyn IdGenerator,
    world_context: Option<&str>,
) -> Result<Character, serde_json::Error> {
    let fields: CharacterContent = serde_json::from_value(content)?;
    Ok(Character {
        id: ids.next_id(),
        name: fields.name,
        description: fields.description,
        personality: fields.personality,
        backstory: fields.backstory,
        avatar: fields.avatar,
        world: world_context.unwrap_or(DEFAULT_WORLD_NAME).to_owned(),
        traits: fields.traits,
    })
}

fn into_world(content: Value, ids: &dyn IdGenerator) -> Result<World, serde_json::Error> {
    let fields: WorldContent = serde_json::from_value(content)?;
    Ok(World {
        id: ids.next_id(),
        name: fields.name,
        description: fields.description,
        genre: fields.genre,
        characters: 0,
        setting: fields.setting,
        lore: fields.lore,
        themes: fields.themes,
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use storyworld_test_support::SequenceIdGenerator;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn test_request_body_omits_absent_world_context() {
        let body = request_body(EntityKind::World, "a city of rain", None);

        assert_eq!(body, json!({ "type": "world", "prompt": "a city of rain" }));
    }

    #[test]
    fn test_request_body_includes_world_context_when_given() {
        let body = request_body(EntityKind::Story, "a heist", Some("Rain City"));

        assert_eq!(body["worldContext"], "Rain City");
        assert_eq!(body["type"], "story");
    }

    #[test]
    fn test_map_response_builds_world_with_zero_characters() {
        let ids = SequenceIdGenerator::new();
        let response = json!({
            "type": "world",
            "content": { "name": "Rain City", "description": "...", "genre": "Noir" },
            "requestId": "abc"
        });

        let entity = map_response(EntityKind::World, response, &ids, None).unwrap();

        assert_eq!(
            entity,
            GeneratedEntity::World(World {
                id: Uuid::from_u128(1),
                name: "Rain City".to_owned(),
                description: "...".to_owned(),
                genre: "Noir".to_owned(),
                characters: 0,
                setting: None,
                lore: None,
                themes: None,
            })
        );
    }

    #[test]
    fn test_map_response_builds_character_with_world_context() {
        let ids = SequenceIdGenerator::new();
        let response = json!({
            "content": {
                "name": "Yuki",
                "description": "A lone hacker",
                "personality": "Dry humour",
                "backstory": "Grew up in the undercity",
                "avatar": "🧑‍💻",
                "traits": ["curious", "guarded"]
            }
        });

        let entity =
            map_response(EntityKind::Character, response, &ids, Some("Cyber Tokyo")).unwrap();

        let GeneratedEntity::Character(character) = entity else {
            panic!("expected a character");
        };
        assert_eq!(character.id, Uuid::from_u128(1));
        assert_eq!(character.world, "Cyber Tokyo");
        assert_eq!(character.personality.as_deref(), Some("Dry humour"));
        assert_eq!(
            character.traits,
            Some(vec!["curious".to_owned(), "guarded".to_owned()])
        );
    }

    #[test]
    fn test_map_response_defaults_character_world() {
        let ids = SequenceIdGenerator::new();
        let response = json!({
            "content": { "name": "Ren", "description": "Seer", "avatar": "🔮" }
        });

        let entity = map_response(EntityKind::Character, response, &ids, None).unwrap();

        let GeneratedEntity::Character(character) = entity else {
            panic!("expected a character");
        };
        assert_eq!(character.world, DEFAULT_WORLD_NAME);
        assert_eq!(character.traits, None);
    }

    #[test]
    fn test_map_response_drops_wrongly_typed_optional_field() {
        let ids = SequenceIdGenerator::new();
        let response = json!({
            "content": {
                "name": "Rain City",
                "description": "...",
                "genre": "Noir",
                "themes": "loss, rain"
            }
        });

        let entity = map_response(EntityKind::World, response, &ids, None).unwrap();

        let GeneratedEntity::World(world) = entity else {
            panic!("expected a world");
        };
        assert_eq!(world.themes, None);
    }

    #[test]
    fn test_map_response_rejects_missing_required_field_without_consuming_an_id() {
        let ids = SequenceIdGenerator::new();
        let response = json!({ "content": { "name": "Rain City", "description": "..." } });

        let err = map_response(EntityKind::World, response, &ids, None).unwrap_err();

        assert!(matches!(err, RequestError::MalformedResponse { .. }));
        assert_eq!(err.message(), "Failed to generate world");
        assert_eq!(ids.peek(), 1);
    }

    #[test]
    fn test_map_response_rejects_missing_or_non_object_content() {
        let ids = SequenceIdGenerator::new();

        let missing = map_response(EntityKind::Story, json!({}), &ids, None).unwrap_err();
        let scalar =
            map_response(EntityKind::Story, json!({ "content": "once upon" }), &ids, None)
                .unwrap_err();

        assert_eq!(missing.message(), "Failed to generate story");
        match scalar {
            RequestError::MalformedResponse { detail, .. } => {
                assert!(detail.contains("a string"));
            }
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn test_map_response_returns_story_content_unshaped() {
        let ids = SequenceIdGenerator::new();
        let content = json!({ "title": "The Long Drizzle", "plotPoints": ["a", "b"] });

        let entity = map_response(
            EntityKind::Story,
            json!({ "content": content.clone() }),
            &ids,
            None,
        )
        .unwrap();

        assert_eq!(entity, GeneratedEntity::Story(content));
        assert_eq!(ids.peek(), 1);
    }
}
