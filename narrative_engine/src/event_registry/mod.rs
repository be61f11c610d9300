//! Event Registry / Scheduler - runs every registered event against each turn.
//!
//! Events are evaluated in insertion order. `once` events are skipped after they
//! fire. The first fired event that yields an override narrative ends the pass:
//! at most one override is produced per pass.

mod snapshot;

pub use snapshot::*;

use std::collections::{BTreeSet, HashMap};

use story_rules::{Event, GameStateManager, Story};

use crate::action_interpreter::{ActionInterpreter, EffectResult, TurnEffects};
use crate::config::{EngineConfig, ForcedExecutionPolicy};
use crate::trigger_evaluator;

pub struct EventRegistry {
    events: Vec<Event>,
    /// Event id -> position in `events`.
    index: HashMap<String, usize>,
    fired: BTreeSet<String>,
    interpreter: ActionInterpreter,
    forced_execution: ForcedExecutionPolicy,
}

impl EventRegistry {
    /// Build a registry from events in load order.
    ///
    /// A repeated id replaces the earlier definition but keeps its position.
    pub fn new(events: impl IntoIterator<Item = Event>, config: &EngineConfig) -> Self {
        let mut registry = Self {
            events: Vec::new(),
            index: HashMap::new(),
            fired: BTreeSet::new(),
            interpreter: ActionInterpreter::new(config),
            forced_execution: config.forced_execution,
        };

        for event in events {
            match registry.index.get(&event.id) {
                Some(&position) => {
                    tracing::warn!(event_id = %event.id, "Duplicate event id, later definition wins");
                    registry.events[position] = event;
                }
                None => {
                    registry.index.insert(event.id.clone(), registry.events.len());
                    registry.events.push(event);
                }
            }
        }

        registry
    }

    pub fn with_defaults(events: impl IntoIterator<Item = Event>) -> Self {
        Self::new(events, &EngineConfig::default())
    }

    /// Register every event of a story.
    pub fn from_story(story: &Story, config: &EngineConfig) -> Self {
        Self::new(story.events.iter().cloned(), config)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn event(&self, id: &str) -> Option<&Event> {
        self.index.get(id).map(|&position| &self.events[position])
    }

    /// Registered events in evaluation order.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn has_fired(&self, id: &str) -> bool {
        self.fired.contains(id)
    }

    /// Evaluate every eligible event against the state and `player_input`.
    ///
    /// Matching events apply their actions immediately, so later events in the
    /// same pass see the mutations. `prompt_instructions` is shared by every
    /// event in the pass.
    pub fn check_and_trigger(
        &mut self,
        state: &mut GameStateManager,
        player_input: &str,
        prompt_instructions: &mut Vec<String>,
    ) -> TurnEffects {
        let mut turn = TurnEffects::default();

        for event in &self.events {
            if event.is_once() && self.fired.contains(&event.id) {
                continue;
            }

            if !trigger_evaluator::evaluate(&event.trigger, state, player_input) {
                continue;
            }

            tracing::debug!(event_id = %event.id, name = %event.name, "Event triggered");
            let effects = self.interpreter.apply(event, state, prompt_instructions);
            let overridden = effects.override_narrative.is_some();
            turn.absorb(&event.id, effects);

            if event.is_once() {
                self.fired.insert(event.id.clone());
            }

            if overridden {
                tracing::debug!(event_id = %event.id, "Override narrative ends this pass");
                break;
            }
        }

        turn
    }

    /// Run an event's actions by id, skipping trigger evaluation.
    ///
    /// Explicit invocation always executes, even for a `once` event that has
    /// already fired. Whether it marks the event fired depends on the
    /// configured [`ForcedExecutionPolicy`]. An unknown id yields empty effects.
    pub fn execute_event_actions(
        &mut self,
        event_id: &str,
        state: &mut GameStateManager,
        prompt_instructions: &mut Vec<String>,
    ) -> EffectResult {
        let Some(&position) = self.index.get(event_id) else {
            tracing::warn!(event_id = %event_id, "Event not found for forced execution");
            return EffectResult::default();
        };

        let event = &self.events[position];
        tracing::info!(event_id = %event_id, "Forcing execution of event actions");
        let effects = self.interpreter.apply(event, state, prompt_instructions);

        if event.is_once() && self.forced_execution == ForcedExecutionPolicy::MarkFired {
            self.fired.insert(event.id.clone());
        }

        effects
    }

    pub fn get_state(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            triggered_event_ids: self.fired.iter().cloned().collect(),
        }
    }

    /// Replace the fired set with the snapshot's.
    pub fn load_state(&mut self, snapshot: RegistrySnapshot) {
        self.fired = snapshot.triggered_event_ids.into_iter().collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use story_rules::{Action, Choice, Condition, GameState, Player, Trigger};

    fn fresh_state() -> GameStateManager {
        GameStateManager::new(GameState::new(Arc::new(Story::new("test", "Test")), Player::new()))
    }

    fn always() -> Trigger {
        Trigger::all(vec![Condition::Location { value: "start".to_string() }])
    }

    fn set_flag(name: &str) -> Action {
        Action::SetFlag { value: name.to_string() }
    }

    fn add_item(item: &str) -> Action {
        Action::AddItem { item_id: item.to_string() }
    }

    #[test]
    fn test_matching_event_applies_actions() {
        let mut registry = EventRegistry::with_defaults([Event::new("e1", "Enter")
            .with_trigger(always())
            .with_action(set_flag("entered"))]);
        let mut state = fresh_state();

        let effects = registry.check_and_trigger(&mut state, "", &mut Vec::new());

        assert_eq!(state.flags().get("entered"), Some(&true));
        assert_eq!(effects.fired_events, vec!["e1".to_string()]);
    }

    #[test]
    fn test_once_fires_once() {
        let mut registry = EventRegistry::with_defaults([
            Event::new("once", "Once").with_trigger(always()).with_action(add_item("coin")).once(),
            Event::new("every", "Every").with_trigger(always()).with_action(add_item("pebble")),
        ]);
        let mut state = fresh_state();

        for _ in 0..4 {
            registry.check_and_trigger(&mut state, "", &mut Vec::new());
        }

        let coins = state.inventory().iter().filter(|i| *i == "coin").count();
        let pebbles = state.inventory().iter().filter(|i| *i == "pebble").count();
        assert_eq!(coins, 1);
        assert_eq!(pebbles, 4);
        assert!(registry.has_fired("once"));
        assert!(!registry.has_fired("every"));
    }

    #[test]
    fn test_override_short_circuits() {
        let mut registry = EventRegistry::with_defaults([
            Event::new("first", "First")
                .with_trigger(always())
                .with_action(Action::OverrideNarrative { text: "The floor gives way.".to_string() }),
            Event::new("second", "Second")
                .with_trigger(always())
                .with_action(set_flag("second_ran")),
        ]);
        let mut state = fresh_state();

        let effects = registry.check_and_trigger(&mut state, "", &mut Vec::new());

        assert_eq!(effects.override_narrative.as_deref(), Some("The floor gives way."));
        assert!(!state.flag("second_ran"));
        assert_eq!(effects.fired_events, vec!["first".to_string()]);
    }

    #[test]
    fn test_empty_override_still_short_circuits() {
        let mut registry = EventRegistry::with_defaults([
            Event::new("blank", "Blank")
                .with_trigger(always())
                .with_action(Action::OverrideNarrative { text: String::new() }),
            Event::new("after", "After").with_trigger(always()).with_action(set_flag("after")),
        ]);
        let mut state = fresh_state();

        let effects = registry.check_and_trigger(&mut state, "", &mut Vec::new());

        assert_eq!(effects.override_narrative.as_deref(), Some(""));
        assert!(!state.flag("after"));
    }

    #[test]
    fn test_choices_concatenate_in_firing_order() {
        let mut registry = EventRegistry::with_defaults([
            Event::new("a", "A")
                .with_trigger(always())
                .with_action(Action::AddChoice(Choice::new("Open", "trigger:open"))),
            Event::new("b", "B")
                .with_trigger(always())
                .with_action(Action::AddChoice(Choice::new("Leave", "leave"))),
        ]);
        let mut state = fresh_state();

        let effects = registry.check_and_trigger(&mut state, "", &mut Vec::new());

        assert_eq!(
            effects.added_choices,
            vec![Choice::new("Open", "trigger:open"), Choice::new("Leave", "leave")]
        );
    }

    #[test]
    fn test_later_events_see_earlier_mutations() {
        let mut registry = EventRegistry::with_defaults([
            Event::new("light", "Light").with_trigger(always()).with_action(set_flag("lit")),
            Event::new("see", "See")
                .with_trigger(Trigger::all(vec![Condition::FlagSet { value: "lit".to_string() }]))
                .with_action(set_flag("saw_mural")),
        ]);
        let mut state = fresh_state();

        registry.check_and_trigger(&mut state, "", &mut Vec::new());
        assert!(state.flag("saw_mural"));
    }

    #[test]
    fn test_prompt_instructions_are_shared() {
        let mut registry = EventRegistry::with_defaults([
            Event::new("a", "A")
                .with_trigger(always())
                .with_action(Action::ModifyPrompt { instruction: "one".to_string() }),
            Event::new("b", "B")
                .with_trigger(always())
                .with_action(Action::ModifyPrompt { instruction: "two".to_string() }),
        ]);
        let mut state = fresh_state();
        let mut instructions = Vec::new();

        registry.check_and_trigger(&mut state, "", &mut instructions);
        assert_eq!(instructions, vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn test_manual_event_only_runs_when_forced() {
        let mut registry = EventRegistry::with_defaults([Event::new("story_start", "Start")
            .with_trigger(Trigger::manual())
            .with_action(Action::OverrideNarrative { text: "Welcome.".to_string() })]);
        let mut state = fresh_state();

        let passive = registry.check_and_trigger(&mut state, "", &mut Vec::new());
        assert!(passive.override_narrative.is_none());

        let forced = registry.execute_event_actions("story_start", &mut state, &mut Vec::new());
        assert_eq!(forced.override_narrative.as_deref(), Some("Welcome."));
    }

    #[test]
    fn test_forced_execution_of_unknown_event() {
        let mut registry = EventRegistry::with_defaults(Vec::new());
        let effects = registry.execute_event_actions("ghost", &mut fresh_state(), &mut Vec::new());
        assert!(effects.is_empty());
    }

    #[test]
    fn test_forced_execution_leaves_fired_set_by_default() {
        let mut registry = EventRegistry::with_defaults([Event::new("vault", "Vault")
            .with_trigger(always())
            .with_action(add_item("gold"))
            .once()]);
        let mut state = fresh_state();

        registry.execute_event_actions("vault", &mut state, &mut Vec::new());
        assert!(!registry.has_fired("vault"));

        registry.check_and_trigger(&mut state, "", &mut Vec::new());
        assert_eq!(state.inventory().len(), 2);
    }

    #[test]
    fn test_forced_execution_can_mark_fired() {
        let config = EngineConfig::default().with_forced_execution(ForcedExecutionPolicy::MarkFired);
        let mut registry = EventRegistry::new(
            [Event::new("vault", "Vault").with_trigger(always()).with_action(add_item("gold")).once()],
            &config,
        );
        let mut state = fresh_state();

        registry.execute_event_actions("vault", &mut state, &mut Vec::new());
        assert!(registry.has_fired("vault"));

        registry.check_and_trigger(&mut state, "", &mut Vec::new());
        assert_eq!(state.inventory().len(), 1);

        registry.execute_event_actions("vault", &mut state, &mut Vec::new());
        assert_eq!(state.inventory().len(), 2);
        assert_eq!(registry.get_state().triggered_event_ids, vec!["vault".to_string()]);
    }

    #[test]
    fn test_duplicate_ids_keep_first_position() {
        let registry = EventRegistry::with_defaults([
            Event::new("a", "Original A"),
            Event::new("b", "B"),
            Event::new("a", "Replacement A"),
        ]);

        let names: Vec<_> = registry.events().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Replacement A", "B"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_state_round_trip() {
        let events = [Event::new("once", "Once").with_trigger(always()).with_action(add_item("coin")).once()];
        let mut registry = EventRegistry::with_defaults(events.clone());
        let mut state = fresh_state();
        registry.check_and_trigger(&mut state, "", &mut Vec::new());

        let json = serde_json::to_string(&registry.get_state()).unwrap();

        let mut restored = EventRegistry::with_defaults(events);
        restored.load_state(serde_json::from_str(&json).unwrap());
        assert!(restored.has_fired("once"));

        restored.check_and_trigger(&mut state, "", &mut Vec::new());
        assert_eq!(state.inventory().len(), 1);
    }
}
