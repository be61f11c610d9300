//! Checkpoints - turn-indexed story milestones read from story metadata.

use serde::{Deserialize, Serialize};
use story_rules::{Checkpoint, GameStateManager};

/// What the checkpoints scheduled for the current turn ask of the game loop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointOutcome {
    pub prompt_injections: Vec<String>,
    pub messages: Vec<String>,
    pub force_end_game: bool,
}

impl CheckpointOutcome {
    pub fn is_empty(&self) -> bool {
        self.prompt_injections.is_empty() && self.messages.is_empty() && !self.force_end_game
    }
}

/// Collect every checkpoint due at the state's current turn count.
pub fn evaluate_checkpoints(state: &GameStateManager) -> CheckpointOutcome {
    let mut outcome = CheckpointOutcome::default();

    for checkpoint in state.story().checkpoints_at(state.turn_count()) {
        apply_checkpoint(checkpoint, state, &mut outcome);
    }

    outcome
}

fn apply_checkpoint(checkpoint: &Checkpoint, state: &GameStateManager, outcome: &mut CheckpointOutcome) {
    tracing::info!(turn = checkpoint.turn, "Checkpoint reached");

    if let Some(injection) = &checkpoint.prompt_injection {
        outcome.prompt_injections.push(injection.clone());
    }

    for flag_message in &checkpoint.flag_messages {
        let message = if state.flag(&flag_message.flag) {
            &flag_message.message_if_set
        } else {
            &flag_message.message_if_not_set
        };
        if let Some(message) = message {
            outcome.messages.push(message.clone());
        }
    }

    outcome.force_end_game |= checkpoint.force_end_game;
}
