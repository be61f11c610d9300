//! Player data: stats and inventory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A stat value. Stories may store numbers, text or booleans under a stat name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl StatValue {
    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StatValue::Int(value) => Some(*value as f64),
            StatValue::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Add two numeric values.
    ///
    /// Two integers stay an integer; anything involving a float becomes a float.
    /// Returns `None` when either side is not numeric or the integer sum overflows.
    pub fn checked_add(&self, other: &StatValue) -> Option<StatValue> {
        match (self, other) {
            (StatValue::Int(a), StatValue::Int(b)) => a.checked_add(*b).map(StatValue::Int),
            _ => Some(StatValue::Float(self.as_f64()? + other.as_f64()?)),
        }
    }
}

impl Default for StatValue {
    fn default() -> Self {
        StatValue::Int(0)
    }
}

impl From<i64> for StatValue {
    fn from(value: i64) -> Self {
        StatValue::Int(value)
    }
}

impl From<i32> for StatValue {
    fn from(value: i32) -> Self {
        StatValue::Int(value.into())
    }
}

impl From<f64> for StatValue {
    fn from(value: f64) -> Self {
        StatValue::Float(value)
    }
}

impl From<&str> for StatValue {
    fn from(value: &str) -> Self {
        StatValue::Text(value.to_string())
    }
}

impl std::fmt::Display for StatValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatValue::Int(value) => write!(f, "{}", value),
            StatValue::Float(value) => write!(f, "{}", value),
            StatValue::Bool(value) => write!(f, "{}", value),
            StatValue::Text(value) => write!(f, "{}", value),
        }
    }
}

/// The player of one playthrough.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Stat name -> value.
    #[serde(default)]
    pub stats: HashMap<String, StatValue>,

    /// Item identifiers in pickup order. Duplicates are not rejected here.
    #[serde(default)]
    pub inventory: Vec<String>,
}

impl Player {
    /// Create a player with no stats and an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style stat assignment.
    pub fn with_stat(mut self, name: impl Into<String>, value: impl Into<StatValue>) -> Self {
        self.stats.insert(name.into(), value.into());
        self
    }

    /// Builder-style item pickup.
    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.inventory.push(item.into());
        self
    }

    /// Check if the player carries an item.
    pub fn has_item(&self, item: &str) -> bool {
        self.inventory.iter().any(|held| held == item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_addition_stays_integer() {
        let sum = StatValue::Int(90).checked_add(&StatValue::Int(-15));
        assert_eq!(sum, Some(StatValue::Int(75)));
    }

    #[test]
    fn test_float_addition_widens() {
        let sum = StatValue::Int(1).checked_add(&StatValue::Float(0.5));
        assert_eq!(sum, Some(StatValue::Float(1.5)));
    }

    #[test]
    fn test_text_is_not_numeric() {
        let text = StatValue::from("brave");
        assert_eq!(text.as_f64(), None);
        assert_eq!(text.checked_add(&StatValue::Int(1)), None);
    }

    #[test]
    fn test_stat_values_deserialize_untagged() {
        let stats: HashMap<String, StatValue> =
            serde_json::from_str(r#"{"health": 100, "luck": 0.25, "cursed": false, "title": "Warden"}"#)
                .unwrap();

        assert_eq!(stats["health"], StatValue::Int(100));
        assert_eq!(stats["luck"], StatValue::Float(0.25));
        assert_eq!(stats["cursed"], StatValue::Bool(false));
        assert_eq!(stats["title"], StatValue::Text("Warden".to_string()));
    }

    #[test]
    fn test_player_builder() {
        let player = Player::new().with_stat("health", 100).with_item("a rusty key");
        assert!(player.has_item("a rusty key"));
        assert!(!player.has_item("lantern"));
        assert_eq!(player.stats.get("health"), Some(&StatValue::Int(100)));
    }
}
