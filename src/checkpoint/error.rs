//! Checkpoint error types.

use crate::fsm::MachineError;
use std::fmt;
use thiserror::Error;

/// Byte encoding a checkpoint was written in or read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Json,
    Binary,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("JSON"),
            Self::Binary => f.write_str("binary"),
        }
    }
}

/// Errors that can occur while taking, encoding or restoring checkpoints
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("Encoding checkpoint as {encoding} failed: {reason}")]
    Encode { encoding: Encoding, reason: String },

    #[error("Decoding {encoding} checkpoint failed: {reason}")]
    Decode { encoding: Encoding, reason: String },

    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The checkpoint names a state the target machine never registered
    #[error("Checkpoint refers to unregistered state '{name}'")]
    UnknownState { name: String },

    #[error(transparent)]
    Machine(#[from] MachineError),
}
