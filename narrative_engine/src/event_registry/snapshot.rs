//! Registry snapshot for save/resume.

use serde::{Deserialize, Serialize};

/// The only registry state that changes during play: which `once` events fired.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// Sorted, so saves are stable.
    #[serde(default)]
    pub triggered_event_ids: Vec<String>,
}
