//! Storyworld Store — process-wide in-memory state.
//!
//! Holds generated characters and worlds, the active conversation session
//! and the set of entity kinds currently being generated. Nothing is
//! persisted: dropping the store discards everything.

use std::collections::HashSet;
use std::sync::Mutex;

use storyworld_conversation::domain::slot::SessionSlot;
use storyworld_core::entity::{Character, World};
use storyworld_core::error::StoryError;
use storyworld_core::sync::lock;
use storyworld_core::transport::EntityKind;
use tracing::debug;
use uuid::Uuid;

/// In-memory collections of characters and worlds plus the active session.
#[derive(Debug, Default)]
pub struct StoryStore {
    characters: Mutex<Vec<Character>>,
    worlds: Mutex<Vec<World>>,
    session: SessionSlot,
    generating: Mutex<HashSet<EntityKind>>,
}

impl StoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a character.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Validation` if a character with the same id is
    /// already stored.
    pub fn add_character(&self, character: Character) -> Result<(), StoryError> {
        let mut characters = lock(&self.characters);
        if characters.iter().any(|c| c.id == character.id) {
            return Err(StoryError::Validation(format!(
                "character {} already exists",
                character.id
            )));
        }
        debug!(character_id = %character.id, name = %character.name, "character stored");
        characters.push(character);
        Ok(())
    }

    /// Inserts a world.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Validation` if a world with the same id is
    /// already stored.
    pub fn add_world(&self, world: World) -> Result<(), StoryError> {
        let mut worlds = lock(&self.worlds);
        if worlds.iter().any(|w| w.id == world.id) {
            return Err(StoryError::Validation(format!(
                "world {} already exists",
                world.id
            )));
        }
        debug!(world_id = %world.id, name = %world.name, "world stored");
        worlds.push(world);
        Ok(())
    }

    /// All characters, in insertion order.
    #[must_use]
    pub fn characters(&self) -> Vec<Character> {
        lock(&self.characters).clone()
    }

    /// All worlds, in insertion order.
    #[must_use]
    pub fn worlds(&self) -> Vec<World> {
        lock(&self.worlds).clone()
    }

    /// Looks a character up by id.
    #[must_use]
    pub fn character(&self, id: Uuid) -> Option<Character> {
        lock(&self.characters).iter().find(|c| c.id == id).cloned()
    }

    /// Looks a world up by id.
    #[must_use]
    pub fn world(&self, id: Uuid) -> Option<World> {
        lock(&self.worlds).iter().find(|w| w.id == id).cloned()
    }

    /// The active-session slot.
    #[must_use]
    pub fn session(&self) -> &SessionSlot {
        &self.session
    }

    /// Marks `kind` as being generated until the returned guard drops.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Busy` if a generation of `kind` is already in
    /// flight.
    pub fn begin_generation(&self, kind: EntityKind) -> Result<GenerationGuard<'_>, StoryError> {
        if !lock(&self.generating).insert(kind) {
            return Err(StoryError::Busy(format!("{kind} generation")));
        }
        Ok(GenerationGuard { store: self, kind })
    }

    /// Whether a generation of `kind` is in flight.
    #[must_use]
    pub fn is_generating(&self, kind: EntityKind) -> bool {
        lock(&self.generating).contains(&kind)
    }
}

/// Releases a generation marker on drop, including when the generating
/// future is abandoned.
#[derive(Debug)]
pub struct GenerationGuard<'a> {
    store: &'a StoryStore,
    kind: EntityKind,
}

impl Drop for GenerationGuard<'_> {
    fn drop(&mut self) {
        lock(&self.store.generating).remove(&self.kind);
    }
}
