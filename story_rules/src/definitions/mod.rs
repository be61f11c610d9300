//! Event definitions: triggers, conditions and actions as authored in story files.
//!
//! Story content is semi-trusted. Condition and action lists are decoded entry by
//! entry, so a typo in one entry turns that entry into an `Unknown` variant
//! instead of rejecting the whole story.

mod action;
mod trigger;

pub use action::*;
pub use trigger::*;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Options recognized on an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventOptions {
    /// Fire at most once per registry lifetime.
    #[serde(default)]
    pub once: bool,
}

/// A named rule: when the trigger matches, the actions run in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub trigger: Trigger,

    #[serde(default, deserialize_with = "deserialize_actions")]
    pub actions: Vec<Action>,

    #[serde(default)]
    pub options: EventOptions,
}

impl Event {
    /// Create an event with a default (never firing) trigger and no actions.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            trigger: Trigger::default(),
            actions: Vec::new(),
            options: EventOptions::default(),
        }
    }

    pub fn with_trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn with_actions(mut self, actions: impl IntoIterator<Item = Action>) -> Self {
        self.actions.extend(actions);
        self
    }

    /// Mark the event as fire-once.
    pub fn once(mut self) -> Self {
        self.options.once = true;
        self
    }

    pub fn is_once(&self) -> bool {
        self.options.once
    }
}

/// Entries that can stand in for an undecodable list element.
pub(crate) trait Recoverable: DeserializeOwned {
    fn unrecognized(kind: Option<String>) -> Self;
}

/// Decode one list entry, falling back to the type's unknown variant.
pub(crate) fn decode_entry<T: Recoverable>(value: serde_json::Value) -> T {
    let kind = value
        .get("type")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned);

    match serde_json::from_value::<T>(value) {
        Ok(entry) => entry,
        Err(error) => {
            tracing::warn!(
                kind = kind.as_deref().unwrap_or("<missing>"),
                error = %error,
                "Unrecognized story entry, treating it as a no-op"
            );
            T::unrecognized(kind)
        }
    }
}

/// Decode a list of raw action values leniently.
pub fn decode_actions(values: Vec<serde_json::Value>) -> Vec<Action> {
    values.into_iter().map(decode_entry).collect()
}

/// Decode a list of raw condition values leniently.
pub(crate) fn decode_conditions(values: Vec<serde_json::Value>) -> Vec<Condition> {
    values.into_iter().map(decode_entry).collect()
}

pub(crate) fn deserialize_actions<'de, D>(deserializer: D) -> Result<Vec<Action>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(decode_actions(values))
}

pub(crate) fn deserialize_conditions<'de, D>(deserializer: D) -> Result<Vec<Condition>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(decode_conditions(values))
}
