//! The `StoryWorld` facade.
//!
//! Owns the store for its whole lifetime and routes every mutation through
//! the generation and conversation handlers, so the store only ever changes
//! in response to a completed operation.

use std::sync::Arc;

use storyworld_conversation::application::command_handlers::{
    handle_send_message, handle_start_session,
};
use storyworld_conversation::application::query_handlers::{self, TranscriptView, get_transcript};
use storyworld_conversation::domain::commands::{SendMessage, StartSession};
use storyworld_core::clock::{Clock, SystemClock};
use storyworld_core::entity::{Character, Message, World};
use storyworld_core::error::StoryError;
use storyworld_core::id::{IdGenerator, TimeOrderedIds};
use storyworld_core::transport::{EntityKind, Operation, Transport};
use storyworld_generation::application::command_handlers::handle_generate;
use storyworld_generation::domain::commands::GenerateEntity;
use storyworld_generation::domain::content::GeneratedEntity;
use storyworld_store::StoryStore;
use storyworld_transport::HttpTransport;
use tracing::info;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::AppError;

/// Process-wide conversation and generation state plus its collaborators.
pub struct StoryWorld {
    store: StoryStore,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl std::fmt::Debug for StoryWorld {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryWorld")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl StoryWorld {
    /// Creates an empty world around the given collaborators.
    #[must_use]
    pub fn new(
        transport: Arc<dyn Transport>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            store: StoryStore::new(),
            transport,
            clock,
            ids,
        }
    }

    /// Creates an empty world talking HTTP to the configured endpoints, with
    /// the system clock and time-ordered ids.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Http` if the HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let transport = HttpTransport::new(Arc::new(config.endpoints.clone()))?;
        info!(
            chat = %config.endpoints.resolve(Operation::Chat),
            generate = %config.endpoints.resolve(Operation::Generate(EntityKind::Story)),
            "story world ready"
        );
        Ok(Self::new(
            Arc::new(transport),
            Arc::new(SystemClock),
            Arc::new(TimeOrderedIds),
        ))
    }

    /// Generates an entity of `kind` from `prompt`.
    ///
    /// Characters and worlds are added to the store exactly once, and only
    /// on success. Stories are handed back without being stored.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Validation` for a blank prompt,
    /// `StoryError::Busy` if a generation of the same kind is already in
    /// flight, and `StoryError::Request` if the remote call fails or its
    /// answer is malformed.
    pub async fn generate(
        &self,
        kind: EntityKind,
        prompt: &str,
        world_context: Option<&str>,
    ) -> Result<GeneratedEntity, StoryError> {
        if prompt.trim().is_empty() {
            return Err(StoryError::Validation("prompt must not be empty".to_owned()));
        }
        let _generating = self.store.begin_generation(kind)?;

        let command = GenerateEntity {
            correlation_id: Uuid::new_v4(),
            kind,
            prompt: prompt.to_owned(),
            world_context: world_context.map(str::to_owned),
        };
        let entity = handle_generate(&command, self.transport.as_ref(), self.ids.as_ref()).await?;

        match &entity {
            GeneratedEntity::Character(character) => self.store.add_character(character.clone())?,
            GeneratedEntity::World(world) => self.store.add_world(world.clone())?,
            GeneratedEntity::Story(_) => {}
        }
        info!(kind = %entity.kind(), "generated entity accepted");
        Ok(entity)
    }

    /// Starts a chat with a stored character, replacing any active session.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Validation` if no character has `character_id`.
    pub fn start_chat(&self, character_id: Uuid) -> Result<Uuid, StoryError> {
        let character = self.store.character(character_id).ok_or_else(|| {
            StoryError::Validation(format!("unknown character {character_id}"))
        })?;
        Ok(self.start_session(character))
    }

    /// Starts a chat with `character`, replacing any active session.
    pub fn start_session(&self, character: Character) -> Uuid {
        let command = StartSession {
            correlation_id: Uuid::new_v4(),
            character,
        };
        handle_start_session(
            &command,
            self.store.session(),
            self.ids.as_ref(),
            self.clock.as_ref(),
        )
    }

    /// Sends a user message in the active session and waits for the reply.
    ///
    /// Returns `Ok(None)` without calling out when `text` is blank or no
    /// session is active, and when the session was replaced before the
    /// reply arrived.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Busy` if a reply is already outstanding and
    /// `StoryError::Request` if the chat operation fails.
    pub async fn send_message(&self, text: &str) -> Result<Option<Message>, StoryError> {
        let command = SendMessage {
            correlation_id: Uuid::new_v4(),
            text: text.to_owned(),
        };
        handle_send_message(
            &command,
            self.store.session(),
            self.transport.as_ref(),
            self.ids.as_ref(),
            self.clock.as_ref(),
        )
        .await
    }

    /// A copy of the active session, if any.
    #[must_use]
    pub fn session_snapshot(&self) -> Option<TranscriptView> {
        get_transcript(self.store.session())
    }

    /// Whether the active session has a chat reply outstanding.
    #[must_use]
    pub fn is_awaiting_reply(&self) -> bool {
        query_handlers::is_awaiting_reply(self.store.session())
    }

    /// Whether a generation of `kind` is in flight.
    #[must_use]
    pub fn is_generating(&self, kind: EntityKind) -> bool {
        self.store.is_generating(kind)
    }

    /// All generated characters, oldest first.
    #[must_use]
    pub fn characters(&self) -> Vec<Character> {
        self.store.characters()
    }

    /// All generated worlds, oldest first.
    #[must_use]
    pub fn worlds(&self) -> Vec<World> {
        self.store.worlds()
    }

    /// Looks a character up by id.
    #[must_use]
    pub fn character(&self, id: Uuid) -> Option<Character> {
        self.store.character(id)
    }

    /// Looks a world up by id.
    #[must_use]
    pub fn world(&self, id: Uuid) -> Option<World> {
        self.store.world(id)
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &StoryStore {
        &self.store
    }
}
