//! Core value types shared by the machine, builder and checkpoints.
//!
//! - State identities via the `State` trait and `StateKey` lookups
//! - The property bag guards observe
//! - Guard predicates over the bag
//! - Transition history

mod guard;
mod history;
mod properties;
mod state;

pub use guard::{Guard, PropertyGuard};
pub use history::{StateHistory, StateTransition};
pub use properties::{Properties, PropertyValue};
pub use state::{State, StateKey};
