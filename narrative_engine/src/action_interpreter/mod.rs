//! Action Interpreter - applies an event's actions to the state store.
//!
//! Actions run strictly in list order, so later actions observe the mutations of
//! earlier ones. Unknown actions are skipped.

mod effects;

pub use effects::*;

use story_rules::{Action, Event, GameStateManager, NarrativePosition};

use crate::config::EngineConfig;

/// Applies event actions. Holds only configuration; all state lives in the store.
#[derive(Debug, Clone, Default)]
pub struct ActionInterpreter {
    deduplicate_added_items: bool,
}

impl ActionInterpreter {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            deduplicate_added_items: config.deduplicate_added_items,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(&EngineConfig::default())
    }

    /// Apply every action of `event`.
    ///
    /// `prompt_instructions` is the turn-wide accumulator; `modify_prompt`
    /// appends to it in place.
    pub fn apply(
        &self,
        event: &Event,
        state: &mut GameStateManager,
        prompt_instructions: &mut Vec<String>,
    ) -> EffectResult {
        let mut effects = EffectResult::default();

        for action in &event.actions {
            self.apply_action(action, state, prompt_instructions, &mut effects);
        }

        effects
    }

    fn apply_action(
        &self,
        action: &Action,
        state: &mut GameStateManager,
        prompt_instructions: &mut Vec<String>,
        effects: &mut EffectResult,
    ) {
        match action {
            Action::SetFlag { value } => state.set_flag(value.as_str()),
            Action::ClearFlag { value } => state.clear_flag(value),
            Action::AddItem { item_id } => {
                if self.deduplicate_added_items && state.has_item(item_id) {
                    return;
                }
                state.add_item(item_id.as_str());
            }
            Action::RemoveItem { value } => state.remove_item(value),
            Action::ChangeLocation { value } => {
                state.set_current_location(value.as_str());
            }
            Action::UpdateStat { stat, change_by } => {
                let current = state.stat(stat).cloned().unwrap_or_default();
                match current.checked_add(change_by) {
                    Some(updated) => state.update_stat(stat.as_str(), updated),
                    None => tracing::warn!(
                        stat = %stat,
                        current = %current,
                        change_by = %change_by,
                        "Cannot apply non-numeric stat change"
                    ),
                }
            }
            Action::OverrideNarrative { text } => {
                effects.override_narrative = Some(text.clone());
            }
            Action::ModifyPrompt { instruction } => {
                prompt_instructions.push(instruction.clone());
            }
            Action::InjectNarrative { text, position } => match position {
                NarrativePosition::Pre => effects.injected_narratives_pre.push(text.clone()),
                NarrativePosition::Post => effects.injected_narratives_post.push(text.clone()),
            },
            Action::AddChoice(choice) => effects.added_choices.push(choice.clone()),
            Action::PresentChoices { choices } => {
                effects.added_choices.extend(choices.iter().cloned());
            }
            Action::Unknown { kind } => {
                tracing::debug!(kind = ?kind, "Skipping unknown action");
            }
        }
    }
}
