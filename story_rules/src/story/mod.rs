//! Story definitions and the read-only metadata that travels with them.

use serde::{Deserialize, Serialize};

use crate::definitions::Event;

/// Location every playthrough starts in unless the story says otherwise.
pub const DEFAULT_LOCATION: &str = "start";

/// Message shown at a checkpoint depending on whether a flag is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagMessage {
    pub flag: String,
    #[serde(default)]
    pub message_if_set: Option<String>,
    #[serde(default)]
    pub message_if_not_set: Option<String>,
}

/// Turn-indexed story milestone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub turn: u32,
    #[serde(default)]
    pub force_end_game: bool,
    #[serde(default)]
    pub prompt_injection: Option<String>,
    #[serde(default)]
    pub flag_messages: Vec<FlagMessage>,
}

/// Descriptive metadata for the surrounding game loop.
///
/// The evaluator never reads any of this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryMetadata {
    pub description: String,
    pub author: String,
    pub version: String,
    pub difficulty: String,
    pub tags: Vec<String>,
    pub content_warnings: Vec<String>,
    pub starting_location: String,
    pub initial_story_part: Option<String>,
    pub total_turns_estimate: u32,
    pub checkpoints: Vec<Checkpoint>,
}

impl Default for StoryMetadata {
    fn default() -> Self {
        Self {
            description: "No description available.".to_string(),
            author: "Unknown".to_string(),
            version: "1.0".to_string(),
            difficulty: "medium".to_string(),
            tags: Vec::new(),
            content_warnings: Vec::new(),
            starting_location: DEFAULT_LOCATION.to_string(),
            initial_story_part: None,
            total_turns_estimate: 20,
            checkpoints: Vec::new(),
        }
    }
}

/// A loaded story. Events are kept in load order, which is also evaluation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub metadata: StoryMetadata,
}

impl Story {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            events: Vec::new(),
            metadata: StoryMetadata::default(),
        }
    }

    pub fn with_event(mut self, event: Event) -> Self {
        self.events.push(event);
        self
    }

    pub fn with_events(mut self, events: impl IntoIterator<Item = Event>) -> Self {
        self.events.extend(events);
        self
    }

    pub fn with_metadata(mut self, metadata: StoryMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Find an event definition by id. A repeated id resolves to its last
    /// definition, matching the registry.
    pub fn event(&self, id: &str) -> Option<&Event> {
        self.events.iter().rev().find(|event| event.id == id)
    }

    /// Checkpoints scheduled for the given turn.
    pub fn checkpoints_at(&self, turn: u32) -> impl Iterator<Item = &Checkpoint> {
        self.metadata
            .checkpoints
            .iter()
            .filter(move |checkpoint| checkpoint.turn == turn)
    }
}
