//! The finite state machine engine.
//!
//! # Key Concepts
//!
//! - **Registry**: states are registered once and addressed by handle
//! - **Transitions**: declared with `from(..).to(..).when(..)`, attached
//!   only when complete, evaluated first-match-wins
//! - **Evaluation pass**: every property update runs exactly one pass and
//!   fires at most one transition
//!
//! A transition declared with `.always()` fires as soon as its origin is
//! current, so it must come last among its origin's transitions. The
//! machine logs a warning when a transition is declared behind one.

mod config;
mod error;
mod machine;
mod transition;

pub use config::{ConfigError, DuplicatePolicy, MachineConfig, DEFAULT_HISTORY_LIMIT};
pub use error::MachineError;
pub use machine::StateMachine;
pub use transition::{BoundTransition, StateId, Transition, TransitionBuilder};
