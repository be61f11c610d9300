//! Effect structures produced by applying events.

use serde::{Deserialize, Serialize};
use story_rules::Choice;

/// Effects of applying one event's actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectResult {
    /// Last `override_narrative` text in the action list, if any.
    pub override_narrative: Option<String>,
    pub injected_narratives_pre: Vec<String>,
    pub injected_narratives_post: Vec<String>,
    pub added_choices: Vec<Choice>,
}

impl EffectResult {
    pub fn is_empty(&self) -> bool {
        self.override_narrative.is_none()
            && self.injected_narratives_pre.is_empty()
            && self.injected_narratives_post.is_empty()
            && self.added_choices.is_empty()
    }
}

/// Effects aggregated over every event fired in one `check_and_trigger` pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnEffects {
    pub override_narrative: Option<String>,
    pub injected_narratives_pre: Vec<String>,
    pub injected_narratives_post: Vec<String>,
    pub added_choices: Vec<Choice>,
    /// Ids of the events that fired, in firing order.
    pub fired_events: Vec<String>,
}

impl TurnEffects {
    /// Fold one event's effects in. A later override replaces an earlier one.
    pub fn absorb(&mut self, event_id: &str, effects: EffectResult) {
        if effects.override_narrative.is_some() {
            self.override_narrative = effects.override_narrative;
        }
        self.injected_narratives_pre
            .extend(effects.injected_narratives_pre);
        self.injected_narratives_post
            .extend(effects.injected_narratives_post);
        self.added_choices.extend(effects.added_choices);
        self.fired_events.push(event_id.to_string());
    }
}

/// Effects waiting for the next turn prompt.
///
/// Passes that run outside `begin_turn` (the start event, a forced event, the
/// response to a choice) can produce output the host has not been shown yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEffects {
    #[serde(default)]
    pub prompt_instructions: Vec<String>,
    #[serde(default)]
    pub injected_narratives_pre: Vec<String>,
    #[serde(default)]
    pub injected_narratives_post: Vec<String>,
    #[serde(default)]
    pub added_choices: Vec<Choice>,
}

impl PendingEffects {
    pub fn is_empty(&self) -> bool {
        self.prompt_instructions.is_empty()
            && self.injected_narratives_pre.is_empty()
            && self.injected_narratives_post.is_empty()
            && self.added_choices.is_empty()
    }

    /// Queue everything of `effects` except the override.
    pub fn hold(&mut self, effects: EffectResult) {
        self.injected_narratives_pre
            .extend(effects.injected_narratives_pre);
        self.injected_narratives_post
            .extend(effects.injected_narratives_post);
        self.added_choices.extend(effects.added_choices);
    }
}

/// What choosing an event-added choice means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChoiceAction {
    /// `trigger:<event_id>` - force-execute that event.
    Trigger(String),
    /// Anything else is handed back as the player's choice text.
    Respond(String),
}

impl ChoiceAction {
    pub const TRIGGER_PREFIX: &'static str = "trigger:";

    pub fn parse(action: &str) -> Self {
        match action.strip_prefix(Self::TRIGGER_PREFIX) {
            Some(event_id) => ChoiceAction::Trigger(event_id.to_string()),
            None => ChoiceAction::Respond(action.to_string()),
        }
    }
}
