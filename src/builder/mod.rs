//! Declarative construction of state machines.
//!
//! [`StateMachineBuilder`] collects a whole setup and validates it at once,
//! reporting every problem together instead of stopping at the first. The
//! [`state_enum!`](crate::state_enum) macro removes the boilerplate of
//! naming enum states.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::{BuildError, SetupIssue};
pub use machine::StateMachineBuilder;
