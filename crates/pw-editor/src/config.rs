//! Engine configuration.
//!
//! Loaded from JSON by the host. Missing fields take their defaults, unknown
//! fields are rejected so typos do not silently fall back.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// How long a press must be held before drop targets are emphasized.
    pub highlight_delay_ms: f64,
    /// Above this many persisted lines, lines are drawn translucent.
    pub translucent_threshold: usize,
    /// Maximum number of undo steps kept.
    pub undo_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            highlight_delay_ms: 300.0,
            translucent_threshold: 25,
            undo_depth: 100,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON config object.
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Invalid engine config: {e}"))
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
