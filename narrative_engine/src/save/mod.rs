//! Save games - a JSON document holding the game state and registry snapshots.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use story_rules::{GameState, GameStateManager, StateSnapshot, Story};

use crate::action_interpreter::PendingEffects;
use crate::config::EngineConfig;
use crate::event_registry::{EventRegistry, RegistrySnapshot};

/// Unique identifier for a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SaveId(pub Uuid);

impl SaveId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SaveId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SaveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("failed to access save file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid save data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("save belongs to story '{expected}', not '{found}'")]
    StoryMismatch { expected: String, found: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveGame {
    pub save_id: SaveId,
    pub game_state: StateSnapshot,
    pub event_manager_state: RegistrySnapshot,

    /// Narrative current when the save was taken.
    #[serde(default)]
    pub narrative: Option<String>,

    /// Effects the next turn prompt still has to show.
    #[serde(default)]
    pub pending: PendingEffects,
}

impl SaveGame {
    /// Snapshot a playthrough.
    pub fn capture(state: &GameStateManager, registry: &EventRegistry) -> Self {
        Self {
            save_id: SaveId::new(),
            game_state: state.state().snapshot(),
            event_manager_state: registry.get_state(),
            narrative: None,
            pending: PendingEffects::default(),
        }
    }

    pub fn with_narrative(mut self, narrative: impl Into<String>) -> Self {
        self.narrative = Some(narrative.into());
        self
    }

    pub fn with_pending(mut self, pending: PendingEffects) -> Self {
        self.pending = pending;
        self
    }

    pub fn story_id(&self) -> &str {
        &self.game_state.story_id
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(source: &str) -> Result<Self, SaveError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), SaveError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?).map_err(|source| SaveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(save_id = %self.save_id, path = %path.display(), "Game saved");
        Ok(())
    }

    pub fn read_from(path: impl AsRef<Path>) -> Result<Self, SaveError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| SaveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&source)
    }

    /// Rebuild the state store and a registry for `story` from this save.
    pub fn restore(
        &self,
        story: Arc<Story>,
        config: &EngineConfig,
    ) -> Result<(GameStateManager, EventRegistry), SaveError> {
        if story.id != self.game_state.story_id {
            return Err(SaveError::StoryMismatch {
                expected: self.game_state.story_id.clone(),
                found: story.id.clone(),
            });
        }

        let mut registry = EventRegistry::from_story(&story, config);
        registry.load_state(self.event_manager_state.clone());
        let state = GameStateManager::new(GameState::from_snapshot(story, self.game_state.clone()));

        Ok((state, registry))
    }
}
