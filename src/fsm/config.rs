//! Machine configuration.
//!
//! Configuration is plain data with serde defaults, so it can be embedded
//! in a larger game settings file or loaded on its own from JSON:
//!
//! ```rust
//! use statebag::fsm::{DuplicatePolicy, MachineConfig};
//!
//! let config = MachineConfig::from_json(r#"{ "history_limit": 16 }"#).unwrap();
//! assert_eq!(config.history_limit, Some(16));
//! assert_eq!(config.duplicate_states, DuplicatePolicy::Reject);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default number of transitions kept in a machine's history.
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

/// What `add_state` does when the name is already registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail with `MachineError::DuplicateState`
    #[default]
    Reject,

    /// Overwrite the previous state, dropping its outbound transitions
    Replace,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub duplicate_states: DuplicatePolicy,

    /// Maximum transitions retained in history. `None` keeps everything.
    pub history_limit: Option<usize>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            duplicate_states: DuplicatePolicy::Reject,
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid machine configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl MachineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn duplicate_states(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_states = policy;
        self
    }

    pub fn history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = limit;
        self
    }
}
