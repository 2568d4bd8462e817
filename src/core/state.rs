//! State identities and the lookup trait used to address them.
//!
//! A machine never compares state values directly. Every state is
//! identified by its name, so both string-named machines (`String`) and
//! enum-tagged machines share one registry representation.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state identities.
///
/// A state is a named discrete mode of the owner's behavior. Its name must
/// be unique within one machine and stable for the lifetime of the value.
///
/// # Required Traits
///
/// - `Clone`: States are copied into transition history
/// - `PartialEq`: States must be comparable in tests and checkpoints
/// - `Debug`: States must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: States must be serializable for checkpoints
///
/// # Example
///
/// ```rust
/// use statebag::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Player {
///     Idle,
///     Running,
///     Jumping,
/// }
///
/// impl State for Player {
///     fn name(&self) -> &str {
///         match self {
///             Self::Idle => "Idle",
///             Self::Running => "Running",
///             Self::Jumping => "Jumping",
///         }
///     }
/// }
///
/// assert_eq!(Player::Running.name(), "Running");
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name, its identity within a machine.
    fn name(&self) -> &str;
}

impl State for String {
    fn name(&self) -> &str {
        self.as_str()
    }
}

/// Anything that can name a registered state.
///
/// Lookup methods on the machine accept `&str` as well as a reference to a
/// state value, so `machine.is("Idle")` and `machine.is(&Player::Idle)`
/// resolve the same way.
pub trait StateKey {
    fn state_name(&self) -> &str;
}

impl StateKey for str {
    fn state_name(&self) -> &str {
        self
    }
}

impl<S: State> StateKey for S {
    fn state_name(&self) -> &str {
        self.name()
    }
}
