//! Trigger Evaluator - decides whether an event's trigger matches this turn.
//!
//! Evaluation is pure: it reads the state store and the player's input and
//! never mutates anything. Data-shape problems (unknown condition kinds,
//! unknown modes) evaluate to "does not match" rather than failing.

use story_rules::{Condition, GameStateManager, Trigger, TriggerMode};

/// Evaluate a trigger against the current state and the latest player input.
///
/// - `AND`: every condition holds; an empty list never fires.
/// - `OR`: at least one condition holds.
/// - `MANUAL` and unrecognized modes never fire.
pub fn evaluate(trigger: &Trigger, state: &GameStateManager, player_input: &str) -> bool {
    if trigger.conditions.is_empty() {
        return false;
    }

    let mut results = trigger
        .conditions
        .iter()
        .map(|condition| condition_met(condition, state, player_input));

    match &trigger.mode {
        TriggerMode::And => results.all(|met| met),
        TriggerMode::Or => results.any(|met| met),
        TriggerMode::Manual => false,
        TriggerMode::Unrecognized(mode) => {
            tracing::debug!(mode = %mode, "Unrecognized trigger mode never fires");
            false
        }
    }
}

/// Evaluate a single condition.
pub fn condition_met(condition: &Condition, state: &GameStateManager, player_input: &str) -> bool {
    match condition {
        Condition::Location { value } => state.current_location() == value,
        Condition::FlagSet { value } => state.flag(value),
        Condition::FlagNotSet { value } => !state.flag(value),
        Condition::PlayerAction { value } => player_input.to_lowercase() == value.to_lowercase(),
        Condition::PlayerActionKeyword { keywords } => {
            if player_input.is_empty() {
                return false;
            }
            let input = player_input.to_lowercase();
            keywords
                .iter()
                .any(|keyword| input.contains(&keyword.to_lowercase()))
        }
        Condition::InventoryHas { value } => state.has_item(value),
        Condition::InventoryNotHas { value } => !state.has_item(value),
        Condition::GameStart => state.turn_count() == 0,
        Condition::TurnCountInLocation { value, operator } => {
            operator.compare(state.turns_in_location(), *value)
        }
        Condition::Unknown { .. } => false,
    }
}
