//! Engine configuration, passed explicitly to the registry and session.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// What forced execution does to the fired set of a `once` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForcedExecutionPolicy {
    /// Forced execution never reads or writes the fired set.
    #[default]
    LeaveUnmarked,
    /// Forced execution of a `once` event records it as fired.
    MarkFired,
}

/// Configuration for the event engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub forced_execution: ForcedExecutionPolicy,

    /// When set, the `add_item` action skips items the player already holds.
    /// The state store itself always appends.
    pub deduplicate_added_items: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid engine config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl EngineConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn with_forced_execution(mut self, policy: ForcedExecutionPolicy) -> Self {
        self.forced_execution = policy;
        self
    }

    pub fn with_deduplicated_items(mut self, deduplicate: bool) -> Self {
        self.deduplicate_added_items = deduplicate;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.forced_execution, ForcedExecutionPolicy::LeaveUnmarked);
        assert!(!config.deduplicate_added_items);
    }

    #[test]
    fn test_from_toml() {
        let config = EngineConfig::from_toml_str(
            r#"
            forced_execution = "mark_fired"
            deduplicate_added_items = true
            "#,
        )
        .unwrap();

        assert_eq!(config.forced_execution, ForcedExecutionPolicy::MarkFired);
        assert!(config.deduplicate_added_items);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_bad_policy_is_rejected() {
        let result = EngineConfig::from_toml_str(r#"forced_execution = "sometimes""#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = EngineConfig::from_file("/definitely/not/here/engine.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
