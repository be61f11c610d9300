//! Story session - the game-loop boundary around the engine.
//!
//! A session owns one playthrough: the state store, the registry and the
//! current narrative. Text generation is delegated to a [`NarrativeGenerator`];
//! rendering and input collection stay with the host.
//!
//! Each turn has two passes. [`StorySession::begin_turn`] evaluates events with
//! no player input and offers choices; [`StorySession::choose`] resolves the
//! player's pick, evaluates events against it and closes the turn.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use story_rules::{Choice, GameState, GameStateManager, Player, Story};

use crate::action_interpreter::{ChoiceAction, PendingEffects};
use crate::checkpoint::{evaluate_checkpoints, CheckpointOutcome};
use crate::config::EngineConfig;
use crate::event_registry::EventRegistry;
use crate::loader::START_EVENT_ID;
use crate::save::{SaveError, SaveGame};

/// Narrative shown until an event or the generator replaces it.
pub const OPENING_NARRATIVE: &str = "The story begins...";

/// The external text generator. Treated as opaque text in, text out.
pub trait NarrativeGenerator {
    /// Continue the story after the player's choice.
    fn continue_story(&mut self, narrative: &str, player_choice: &str, instructions: &[String]) -> String;

    /// Suggest choices for the current narrative.
    fn suggest_choices(&mut self, narrative: &str) -> Vec<String>;
}

/// A choice offered to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChoiceOption {
    /// Suggested by the generator; chosen text becomes player input.
    Suggested(String),
    /// Added by an event.
    Event(Choice),
}

impl ChoiceOption {
    pub fn label(&self) -> &str {
        match self {
            ChoiceOption::Suggested(text) => text,
            ChoiceOption::Event(choice) => &choice.label,
        }
    }

    pub fn event_choice(&self) -> Option<&Choice> {
        match self {
            ChoiceOption::Suggested(_) => None,
            ChoiceOption::Event(choice) => Some(choice),
        }
    }
}

/// What the host shows at the start of a turn.
///
/// Injections and event choices queued since the previous prompt come first,
/// followed by those of this turn's input-less pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnPrompt {
    pub turn: u32,
    pub narrative: String,
    pub injected_pre: Vec<String>,
    pub injected_post: Vec<String>,
    pub choices: Vec<ChoiceOption>,
}

/// What the host shows after the player chose.
///
/// Choices added while resolving the choice are offered by the next prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub narrative: String,
    pub injected_pre: Vec<String>,
    pub injected_post: Vec<String>,
    pub checkpoint: CheckpointOutcome,
    pub game_over: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("choice {index} is out of range ({available} available)")]
    InvalidChoice { index: usize, available: usize },

    #[error("no turn in progress")]
    NoTurnInProgress,

    #[error("the story has ended")]
    GameOver,
}

pub struct StorySession<G> {
    state: GameStateManager,
    registry: EventRegistry,
    generator: G,
    narrative: String,
    /// Instructions for the turn in progress.
    prompt_instructions: Vec<String>,
    /// Output queued for the next prompt.
    pending: PendingEffects,
    /// The prompt of the turn awaiting a choice.
    open_turn: Option<TurnPrompt>,
    turn_location: String,
    game_over: bool,
}

impl<G: NarrativeGenerator> StorySession<G> {
    /// Start a new playthrough and run the story's start event, if it has one.
    ///
    /// Everything the start event produces besides its override is shown by
    /// the first prompt.
    pub fn new(story: Arc<Story>, player: Player, generator: G, config: &EngineConfig) -> Self {
        let registry = EventRegistry::from_story(&story, config);
        let starting_location = story.metadata.starting_location.clone();
        let mut state = GameStateManager::new(GameState::new(story, player));
        state.set_current_location(starting_location);

        let mut session = Self::from_parts(state, registry, generator);
        if session.registry.event(START_EVENT_ID).is_some() {
            let mut effects = session.registry.execute_event_actions(
                START_EVENT_ID,
                &mut session.state,
                &mut session.pending.prompt_instructions,
            );
            session.adopt_override(effects.override_narrative.take());
            session.pending.hold(effects);
        }
        session
    }

    /// Continue a saved playthrough.
    pub fn resume(
        story: Arc<Story>,
        save: &SaveGame,
        generator: G,
        config: &EngineConfig,
    ) -> Result<Self, SaveError> {
        let (state, registry) = save.restore(story, config)?;
        let mut session = Self::from_parts(state, registry, generator);
        if let Some(narrative) = &save.narrative {
            session.narrative = narrative.clone();
        }
        session.pending = save.pending.clone();
        Ok(session)
    }

    fn from_parts(state: GameStateManager, registry: EventRegistry, generator: G) -> Self {
        let turn_location = state.current_location().to_string();
        Self {
            state,
            registry,
            generator,
            narrative: OPENING_NARRATIVE.to_string(),
            prompt_instructions: Vec::new(),
            pending: PendingEffects::default(),
            open_turn: None,
            turn_location,
            game_over: false,
        }
    }

    pub fn narrative(&self) -> &str {
        &self.narrative
    }

    pub fn state(&self) -> &GameStateManager {
        &self.state
    }

    pub fn registry(&self) -> &EventRegistry {
        &self.registry
    }

    pub fn is_over(&self) -> bool {
        self.game_over
    }

    /// Snapshot the playthrough.
    ///
    /// A turn still awaiting its choice is saved as pending output, so the
    /// resumed session's first prompt shows it again.
    pub fn save(&self) -> SaveGame {
        let pending = match &self.open_turn {
            Some(prompt) => PendingEffects {
                prompt_instructions: self.prompt_instructions.clone(),
                injected_narratives_pre: prompt.injected_pre.clone(),
                injected_narratives_post: prompt.injected_post.clone(),
                added_choices: prompt
                    .choices
                    .iter()
                    .filter_map(ChoiceOption::event_choice)
                    .cloned()
                    .collect(),
            },
            None => self.pending.clone(),
        };

        SaveGame::capture(&self.state, &self.registry)
            .with_narrative(self.narrative.as_str())
            .with_pending(pending)
    }

    /// Run the input-less pass and offer choices.
    pub fn begin_turn(&mut self) -> Result<TurnPrompt, SessionError> {
        if self.game_over {
            return Err(SessionError::GameOver);
        }

        let PendingEffects {
            prompt_instructions,
            injected_narratives_pre: mut injected_pre,
            injected_narratives_post: mut injected_post,
            added_choices: held_choices,
        } = std::mem::take(&mut self.pending);
        self.prompt_instructions = prompt_instructions;
        self.turn_location = self.state.current_location().to_string();

        let effects = self
            .registry
            .check_and_trigger(&mut self.state, "", &mut self.prompt_instructions);
        self.adopt_override(effects.override_narrative);
        injected_pre.extend(effects.injected_narratives_pre);
        injected_post.extend(effects.injected_narratives_post);

        let mut choices: Vec<ChoiceOption> = self
            .generator
            .suggest_choices(&self.narrative)
            .into_iter()
            .map(ChoiceOption::Suggested)
            .collect();
        choices.extend(
            held_choices
                .into_iter()
                .chain(effects.added_choices)
                .map(ChoiceOption::Event),
        );

        let prompt = TurnPrompt {
            turn: self.state.turn_count(),
            narrative: self.narrative.clone(),
            injected_pre,
            injected_post,
            choices,
        };
        self.open_turn = Some(prompt.clone());
        Ok(prompt)
    }

    /// Resolve the player's choice and close the turn.
    pub fn choose(&mut self, index: usize) -> Result<TurnOutcome, SessionError> {
        if self.game_over {
            return Err(SessionError::GameOver);
        }

        let choices = &self
            .open_turn
            .as_ref()
            .ok_or(SessionError::NoTurnInProgress)?
            .choices;
        let choice = choices
            .get(index)
            .cloned()
            .ok_or(SessionError::InvalidChoice {
                index,
                available: choices.len(),
            })?;
        self.open_turn = None;

        let injected = match choice {
            ChoiceOption::Suggested(text) => self.respond(&text),
            ChoiceOption::Event(choice) => match ChoiceAction::parse(&choice.action) {
                ChoiceAction::Trigger(event_id) => {
                    let effects = self.registry.execute_event_actions(
                        &event_id,
                        &mut self.state,
                        &mut self.prompt_instructions,
                    );
                    self.adopt_override(effects.override_narrative);
                    self.pending.added_choices.extend(effects.added_choices);
                    (effects.injected_narratives_pre, effects.injected_narratives_post)
                }
                ChoiceAction::Respond(text) => self.respond(&text),
            },
        };

        Ok(self.end_turn(injected))
    }

    /// Returns the pre and post injections of the pass.
    fn respond(&mut self, player_choice: &str) -> (Vec<String>, Vec<String>) {
        let effects = self.registry.check_and_trigger(
            &mut self.state,
            player_choice,
            &mut self.prompt_instructions,
        );

        match effects.override_narrative.filter(|text| !text.is_empty()) {
            Some(text) => self.narrative = text,
            None => {
                let continued = self.generator.continue_story(
                    &self.narrative,
                    player_choice,
                    &self.prompt_instructions,
                );
                self.narrative = continued;
            }
        }
        self.pending.added_choices.extend(effects.added_choices);

        (effects.injected_narratives_pre, effects.injected_narratives_post)
    }

    fn end_turn(&mut self, (injected_pre, injected_post): (Vec<String>, Vec<String>)) -> TurnOutcome {
        // A turn only counts toward a location the player stayed in throughout.
        if self.state.current_location() == self.turn_location {
            self.state.increment_turns_in_location();
        }
        self.state.increment_turn();

        let checkpoint = evaluate_checkpoints(&self.state);
        self.pending
            .prompt_instructions
            .extend(checkpoint.prompt_injections.iter().cloned());
        if checkpoint.force_end_game {
            tracing::info!(turn = self.state.turn_count(), "Checkpoint ended the game");
            self.game_over = true;
        }

        TurnOutcome {
            narrative: self.narrative.clone(),
            injected_pre,
            injected_post,
            checkpoint,
            game_over: self.game_over,
        }
    }

    /// Empty overrides leave the narrative unchanged.
    fn adopt_override(&mut self, override_narrative: Option<String>) {
        if let Some(text) = override_narrative.filter(|text| !text.is_empty()) {
            self.narrative = text;
        }
    }
}
