//! The state store accessor - the only mutation surface for [`GameState`].
//!
//! Every operation is total: missing keys read as defaults and nothing fails.

use std::collections::HashMap;
use std::sync::Arc;

use super::GameState;
use crate::player::{Player, StatValue};
use crate::story::Story;

#[derive(Debug, Clone)]
pub struct GameStateManager {
    state: GameState,
}

impl GameStateManager {
    pub fn new(state: GameState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn story(&self) -> &Arc<Story> {
        &self.state.story
    }

    pub fn player(&self) -> &Player {
        &self.state.player
    }

    // Flags

    pub fn flags(&self) -> &HashMap<String, bool> {
        &self.state.flags
    }

    pub fn flag(&self, name: &str) -> bool {
        self.state.flags.get(name).copied().unwrap_or(false)
    }

    pub fn set_flag(&mut self, name: impl Into<String>) {
        self.state.flags.insert(name.into(), true);
    }

    /// Remove the flag entirely.
    pub fn clear_flag(&mut self, name: &str) {
        self.state.flags.remove(name);
    }

    // Inventory

    pub fn inventory(&self) -> &[String] {
        &self.state.player.inventory
    }

    pub fn has_item(&self, item: &str) -> bool {
        self.state.player.has_item(item)
    }

    /// Append an item. Duplicates are accepted.
    pub fn add_item(&mut self, item: impl Into<String>) {
        self.state.player.inventory.push(item.into());
    }

    /// Remove the first matching item, if any.
    pub fn remove_item(&mut self, item: &str) {
        let inventory = &mut self.state.player.inventory;
        if let Some(position) = inventory.iter().position(|held| held == item) {
            inventory.remove(position);
        }
    }

    // Stats

    pub fn stats(&self) -> &HashMap<String, StatValue> {
        &self.state.player.stats
    }

    pub fn stat(&self, name: &str) -> Option<&StatValue> {
        self.state.player.stats.get(name)
    }

    /// Replace the stat value. Callers wanting a delta read first.
    pub fn update_stat(&mut self, name: impl Into<String>, value: StatValue) {
        self.state.player.stats.insert(name.into(), value);
    }

    // Location and turns

    pub fn current_location(&self) -> &str {
        &self.state.current_location
    }

    /// Move to `location`. Returns whether the location actually changed; only a
    /// real change resets the turns-in-location counter.
    pub fn set_current_location(&mut self, location: impl Into<String>) -> bool {
        let location = location.into();
        if self.state.current_location == location {
            return false;
        }
        self.state.current_location = location;
        self.state.turns_in_location = 0;
        true
    }

    pub fn turns_in_location(&self) -> u32 {
        self.state.turns_in_location
    }

    pub fn increment_turns_in_location(&mut self) {
        self.state.turns_in_location = self.state.turns_in_location.saturating_add(1);
    }

    pub fn turn_count(&self) -> u32 {
        self.state.turn_count
    }

    pub fn increment_turn(&mut self) {
        self.state.turn_count = self.state.turn_count.saturating_add(1);
    }
}
