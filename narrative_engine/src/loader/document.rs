//! On-disk shapes of story files.
//!
//! A story directory holds one or more TOML files. Any of them may carry a
//! `[story]` table and any number of `[[events]]` entries.

use serde::Deserialize;
use std::collections::HashMap;

use story_rules::{decode_actions, Event, EventOptions, StatValue, StoryMetadata, Trigger};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct StoryFile {
    #[serde(default)]
    pub story: Option<StoryDocument>,

    #[serde(default)]
    pub events: Vec<EventDocument>,
}

/// The `[story]` table.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct StoryDocument {
    pub title: Option<String>,
    pub starting_location: Option<String>,
    pub initial_player_stats: Option<HashMap<String, StatValue>>,
    pub initial_inventory: Option<Vec<String>>,

    #[serde(flatten)]
    pub metadata: StoryMetadata,
}

impl StoryDocument {
    pub fn into_metadata(self) -> StoryMetadata {
        let mut metadata = self.metadata;
        if let Some(location) = self.starting_location {
            metadata.starting_location = location;
        }
        metadata
    }
}

/// One `[[events]]` entry, before required fields are checked.
#[derive(Debug, Deserialize)]
pub(crate) struct EventDocument {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Only meaningful on `story_start`.
    pub title: Option<String>,
    pub trigger: Option<Trigger>,
    pub actions: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub options: EventOptions,
    pub initial_player_stats: Option<HashMap<String, StatValue>>,
    pub initial_inventory: Option<Vec<String>>,
}

impl EventDocument {
    pub fn into_event(self, id: String) -> Event {
        Event {
            id,
            name: self.name.unwrap_or_default(),
            trigger: self.trigger.unwrap_or_default(),
            actions: decode_actions(self.actions.unwrap_or_default()),
            options: self.options,
        }
    }
}
