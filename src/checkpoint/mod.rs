//! Checkpoint and restore for running machines.
//!
//! States and guards are declared in code, so a checkpoint only captures
//! the runtime part of a machine: the current state, the property bag and
//! the transition history. Restoring requires a machine with the same
//! setup, typically the one the game rebuilds on load.
//!
//! # Example
//!
//! ```rust
//! use statebag::checkpoint::Checkpoint;
//! use statebag::fsm::StateMachine;
//!
//! fn setup() -> StateMachine<String> {
//!     let mut machine = StateMachine::new();
//!     machine.add_state("Idle".to_string()).unwrap();
//!     machine.add_state("Running".to_string()).unwrap();
//!     machine.from("Idle").unwrap().to("Running").unwrap().when(|p| p.flag("moving"));
//!     machine.set_current_state("Idle").unwrap();
//!     machine
//! }
//!
//! let mut machine = setup();
//! machine.set_property("moving", true).unwrap();
//!
//! let json = machine.checkpoint().unwrap().to_json().unwrap();
//!
//! let mut reloaded = setup();
//! reloaded.restore(&Checkpoint::from_json(&json).unwrap()).unwrap();
//! assert!(reloaded.is("Running"));
//! assert!(reloaded.properties().flag("moving"));
//! ```

use crate::core::{Properties, PropertyValue, State, StateHistory};
use crate::fsm::StateMachine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

pub mod error;

pub use error::{CheckpointError, Encoding};

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a machine's runtime data.
/// Does NOT include states or guards (declared in code).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Checkpoint<S: State> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: Uuid,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    pub current_state: S,

    pub properties: Properties,

    pub history: StateHistory<S>,

    /// Evaluation passes run before the checkpoint was taken
    pub passes: u64,
}

impl<S: State> Checkpoint<S> {
    /// Encode as pretty-printed JSON.
    ///
    /// JSON has no NaN or infinity, so a bag holding a non-finite float is
    /// refused here instead of being written as an unreadable `null`.
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        if let Some((key, value)) = self
            .properties
            .iter()
            .find(|(_, value)| matches!(value, PropertyValue::Float(f) if !f.is_finite()))
        {
            return Err(CheckpointError::Encode {
                encoding: Encoding::Json,
                reason: format!("property '{key}' holds non-finite value {value}"),
            });
        }
        serde_json::to_string_pretty(self).map_err(|e| CheckpointError::Encode {
            encoding: Encoding::Json,
            reason: e.to_string(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json).map_err(|e| CheckpointError::Decode {
            encoding: Encoding::Json,
            reason: e.to_string(),
        })?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::Encode {
            encoding: Encoding::Binary,
            reason: e.to_string(),
        })
    }

    pub fn from_binary(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes).map_err(|e| CheckpointError::Decode {
            encoding: Encoding::Binary,
            reason: e.to_string(),
        })?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    fn check_version(&self) -> Result<(), CheckpointError> {
        if self.version == CHECKPOINT_VERSION {
            Ok(())
        } else {
            Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            })
        }
    }
}

impl<S: State> StateMachine<S> {
    /// Snapshot the current state, property bag and history.
    pub fn checkpoint(&self) -> Result<Checkpoint<S>, CheckpointError> {
        let current_state = self.current_state()?.clone();
        Ok(Checkpoint {
            version: CHECKPOINT_VERSION,
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            current_state,
            properties: self.properties.clone(),
            history: self.history.clone(),
            passes: self.passes,
        })
    }

    /// Restore runtime data from a checkpoint.
    ///
    /// Every state the checkpoint mentions must be registered on this
    /// machine. No evaluation pass runs. The restored history is trimmed to
    /// this machine's configured limit. On error the machine is unchanged.
    pub fn restore(&mut self, checkpoint: &Checkpoint<S>) -> Result<(), CheckpointError> {
        checkpoint.check_version()?;

        let current = self
            .state_id(&checkpoint.current_state)
            .ok_or_else(|| unknown(&checkpoint.current_state))?;

        for transition in checkpoint.history.transitions() {
            for state in [&transition.from, &transition.to] {
                if !self.contains_state(state) {
                    return Err(unknown(state));
                }
            }
        }

        let mut history = match self.config().history_limit {
            Some(limit) => StateHistory::bounded(limit),
            None => StateHistory::new(),
        };
        for transition in checkpoint.history.transitions() {
            history.push(transition.clone());
        }

        self.current = Some(current);
        self.properties = checkpoint.properties.clone();
        self.history = history;
        self.passes = checkpoint.passes;

        debug!(
            checkpoint = %checkpoint.id,
            state = checkpoint.current_state.name(),
            "Checkpoint restored"
        );
        Ok(())
    }
}

fn unknown<S: State>(state: &S) -> CheckpointError {
    CheckpointError::UnknownState {
        name: state.name().to_string(),
    }
}
