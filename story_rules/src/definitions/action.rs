//! Action definitions.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Recoverable;
use crate::player::StatValue;

/// Where injected narrative is shown relative to the main narrative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NarrativePosition {
    Pre,
    #[default]
    Post,
}

impl NarrativePosition {
    /// `pre` in any case means before; everything else means after.
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("pre") {
            NarrativePosition::Pre
        } else {
            NarrativePosition::Post
        }
    }
}

impl Serialize for NarrativePosition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(match self {
            NarrativePosition::Pre => "pre",
            NarrativePosition::Post => "post",
        })
    }
}

impl<'de> Deserialize<'de> for NarrativePosition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(NarrativePosition::from_name(&name))
    }
}

/// An extra choice offered to the player.
///
/// `action` is either opaque text handed back as the player's choice, or
/// `trigger:<event_id>` to force-execute that event when chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    pub action: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: action.into(),
        }
    }
}

/// A declarative instruction applied against the game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    SetFlag { value: String },

    ClearFlag { value: String },

    AddItem { item_id: String },

    RemoveItem { value: String },

    /// Move the player; resets turns-in-location when the location differs.
    ChangeLocation { value: String },

    /// Add `change_by` to the stat (missing stats read as 0).
    UpdateStat { stat: String, change_by: StatValue },

    /// Replace this turn's narrative.
    OverrideNarrative {
        #[serde(default)]
        text: String,
    },

    /// Append an instruction for the text generator.
    ModifyPrompt {
        #[serde(default)]
        instruction: String,
    },

    InjectNarrative {
        #[serde(default)]
        text: String,
        #[serde(default)]
        position: NarrativePosition,
    },

    AddChoice(Choice),

    PresentChoices {
        #[serde(default)]
        choices: Vec<Choice>,
    },

    /// An action that could not be decoded. Applying it does nothing.
    #[serde(skip_deserializing)]
    Unknown { kind: Option<String> },
}

impl Recoverable for Action {
    fn unrecognized(kind: Option<String>) -> Self {
        Action::Unknown { kind }
    }
}
