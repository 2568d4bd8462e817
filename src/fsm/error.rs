//! Errors raised by machine setup and queries.

use thiserror::Error;

/// Errors that can occur while setting up or driving a machine.
///
/// All of them are programming errors surfaced at the call site. The
/// machine is left exactly as it was before the failing call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MachineError {
    /// A call referenced a state that was never registered
    #[error("Unknown state '{name}'")]
    UnknownState { name: String },

    /// Evaluation or a current-state query ran before `set_current_state`
    #[error("No current state. Call .set_current_state(state) first")]
    NoCurrentState,

    /// `add_state` was called twice with the same name
    #[error("State '{name}' is already registered")]
    DuplicateState { name: String },
}

impl MachineError {
    pub(crate) fn unknown(name: &str) -> Self {
        Self::UnknownState {
            name: name.to_string(),
        }
    }
}
