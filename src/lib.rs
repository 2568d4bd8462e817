//! Statebag: a property-driven finite state machine
//!
//! Statebag drives a character's behavioral state (idle, running,
//! crouched, jumping, wall-sliding, ...) from a live bag of simulation
//! properties. The owner registers states and guarded transitions once,
//! then pushes property updates every tick; each update runs one
//! evaluation pass that fires at most one transition. The machine never
//! touches rendering or physics. The owner queries the current state and
//! decides which animation to play or which collision shape to use.
//!
//! # Core Concepts
//!
//! - **State**: a named mode, either a `String` or an enum via `state_enum!`
//! - **Guard**: a pure predicate over the property bag
//! - **Evaluation pass**: scan the current state's transitions in
//!   declaration order and switch on the first passing guard
//! - **History**: bounded record of performed switches
//!
//! # Example
//!
//! ```rust
//! use statebag::fsm::StateMachine;
//! use statebag::state_enum;
//!
//! state_enum! {
//!     enum Player {
//!         Idle,
//!         Running,
//!         Jumping,
//!     }
//! }
//!
//! let mut player = StateMachine::new();
//! player
//!     .add_state(Player::Idle)?
//!     .add_state(Player::Running)?
//!     .add_state(Player::Jumping)?;
//!
//! player
//!     .from(&Player::Idle)?
//!     .to(&Player::Jumping)?
//!     .when(|p| p.flag("jump_pressed") && p.flag("on_floor"))
//!     .from(&Player::Idle)?
//!     .to(&Player::Running)?
//!     .when(|p| p.number("velocity_x").is_some_and(|v| v != 0.0));
//!
//! player.set_current_state(&Player::Idle)?;
//!
//! player.set_properties([("on_floor", true), ("jump_pressed", true)])?;
//! assert!(player.is(&Player::Jumping));
//! assert!(player.is_one_of(&["Jumping", "Falling"]));
//! # Ok::<(), statebag::fsm::MachineError>(())
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod fsm;

// Re-export commonly used types
pub use builder::{BuildError, StateMachineBuilder};
pub use checkpoint::{Checkpoint, CheckpointError};
pub use self::core::{Guard, Properties, PropertyGuard, PropertyValue, State, StateKey};
pub use fsm::{MachineConfig, MachineError, StateMachine};
