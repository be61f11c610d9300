//! Game state for one playthrough, and the store through which it is mutated.

mod manager;

pub use manager::*;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::player::Player;
use crate::story::{Story, DEFAULT_LOCATION};

/// The mutable state of one playthrough.
///
/// Fields are private: reads go through the getters, writes go through
/// [`GameStateManager`].
#[derive(Debug, Clone)]
pub struct GameState {
    story: Arc<Story>,
    player: Player,
    /// Absent and `false` mean the same thing.
    flags: HashMap<String, bool>,
    turn_count: u32,
    current_location: String,
    turns_in_location: u32,
}

impl GameState {
    /// Fresh state at the default location with no turns played.
    pub fn new(story: Arc<Story>, player: Player) -> Self {
        Self {
            story,
            player,
            flags: HashMap::new(),
            turn_count: 0,
            current_location: DEFAULT_LOCATION.to_string(),
            turns_in_location: 0,
        }
    }

    /// Rebuild state from a snapshot taken for the same story.
    pub fn from_snapshot(story: Arc<Story>, snapshot: StateSnapshot) -> Self {
        Self {
            story,
            player: snapshot.player,
            flags: snapshot.flags,
            turn_count: snapshot.turn_count,
            current_location: snapshot.current_location,
            turns_in_location: snapshot.turns_in_location,
        }
    }

    /// Capture everything except the story itself.
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            story_id: self.story.id.clone(),
            player: self.player.clone(),
            flags: self.flags.clone(),
            turn_count: self.turn_count,
            current_location: self.current_location.clone(),
            turns_in_location: self.turns_in_location,
        }
    }

    pub fn story(&self) -> &Arc<Story> {
        &self.story
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn flags(&self) -> &HashMap<String, bool> {
        &self.flags
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn current_location(&self) -> &str {
        &self.current_location
    }

    pub fn turns_in_location(&self) -> u32 {
        self.turns_in_location
    }
}

/// Serializable copy of a [`GameState`]. The story is referenced by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub story_id: String,
    pub player: Player,
    #[serde(default)]
    pub flags: HashMap<String, bool>,
    #[serde(default)]
    pub turn_count: u32,
    #[serde(default = "default_location")]
    pub current_location: String,
    #[serde(default)]
    pub turns_in_location: u32,
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}
