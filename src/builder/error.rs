//! Build errors for the declarative machine builder.

use crate::fsm::MachineError;
use thiserror::Error;

/// One problem found while validating a builder's setup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SetupIssue {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("State '{name}' is registered more than once")]
    DuplicateState { name: String },

    #[error("Transition origin '{name}' is not a registered state")]
    UnknownOrigin { name: String },

    #[error("Transition target '{name}' (from '{from}') is not a registered state")]
    UnknownTarget { from: String, name: String },

    #[error("Initial state '{name}' is not a registered state")]
    UnknownInitial { name: String },
}

/// Errors that can occur when building a state machine.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Every issue found in the setup, in declaration order
    #[error("Invalid state machine setup: {}", summarize(.issues))]
    Invalid { issues: Vec<SetupIssue> },

    #[error(transparent)]
    Machine(#[from] MachineError),
}

impl BuildError {
    /// Issues reported by validation, empty for machine errors.
    pub fn issues(&self) -> &[SetupIssue] {
        match self {
            Self::Invalid { issues } => issues.as_slice(),
            Self::Machine(_) => &[],
        }
    }
}

fn summarize(issues: &[SetupIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
