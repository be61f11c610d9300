//! Trigger definitions.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{deserialize_conditions, Recoverable};

/// How a trigger combines its conditions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TriggerMode {
    /// Every condition must hold.
    #[default]
    And,
    /// At least one condition must hold.
    Or,
    /// Never fires on its own; the event is only reachable by forced execution.
    Manual,
    /// A mode the engine does not know. Never fires.
    Unrecognized(String),
}

impl TriggerMode {
    /// Parse a mode name, ignoring case.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "AND" => TriggerMode::And,
            "OR" => TriggerMode::Or,
            "MANUAL" => TriggerMode::Manual,
            _ => TriggerMode::Unrecognized(name.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TriggerMode::And => "AND",
            TriggerMode::Or => "OR",
            TriggerMode::Manual => "MANUAL",
            TriggerMode::Unrecognized(name) => name,
        }
    }
}

impl Serialize for TriggerMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TriggerMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(TriggerMode::from_name(&name))
    }
}

/// Comparison used by `turn_count_in_location`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ComparisonOperator {
    #[default]
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = ">")]
    Greater,
    #[serde(rename = "<")]
    Less,
}

impl ComparisonOperator {
    /// Compare a turn count against a numeric threshold.
    pub fn compare(self, actual: u32, target: f64) -> bool {
        let actual = f64::from(actual);
        match self {
            ComparisonOperator::Equal => actual == target,
            ComparisonOperator::GreaterOrEqual => actual >= target,
            ComparisonOperator::LessOrEqual => actual <= target,
            ComparisonOperator::Greater => actual > target,
            ComparisonOperator::Less => actual < target,
        }
    }
}

/// A single condition inside a trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    /// Current location equals `value`.
    Location { value: String },

    FlagSet { value: String },

    FlagNotSet { value: String },

    /// Player input equals `value`, ignoring case.
    PlayerAction { value: String },

    /// Player input contains any keyword, ignoring case.
    PlayerActionKeyword {
        #[serde(default)]
        keywords: Vec<String>,
    },

    InventoryHas { value: String },

    InventoryNotHas { value: String },

    /// No turn has completed yet.
    GameStart,

    /// Compares turns spent in the current location against `value`.
    /// Any number is accepted; negative and fractional thresholds compare as written.
    TurnCountInLocation {
        value: f64,
        #[serde(default)]
        operator: ComparisonOperator,
    },

    /// A condition that could not be decoded. Never matches.
    #[serde(skip_deserializing)]
    Unknown { kind: Option<String> },
}

impl Recoverable for Condition {
    fn unrecognized(kind: Option<String>) -> Self {
        Condition::Unknown { kind }
    }
}

/// A trigger: a mode plus the conditions it combines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    #[serde(default)]
    pub mode: TriggerMode,

    #[serde(default, deserialize_with = "deserialize_conditions")]
    pub conditions: Vec<Condition>,
}

impl Trigger {
    /// All conditions must hold.
    pub fn all(conditions: Vec<Condition>) -> Self {
        Self {
            mode: TriggerMode::And,
            conditions,
        }
    }

    /// Any condition may hold.
    pub fn any(conditions: Vec<Condition>) -> Self {
        Self {
            mode: TriggerMode::Or,
            conditions,
        }
    }

    /// Only reachable through forced execution.
    pub fn manual() -> Self {
        Self {
            mode: TriggerMode::Manual,
            conditions: Vec::new(),
        }
    }
}
