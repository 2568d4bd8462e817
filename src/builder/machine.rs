//! Builder for constructing state machines.

use crate::builder::error::{BuildError, SetupIssue};
use crate::core::{Guard, Properties, State};
use crate::fsm::{DuplicatePolicy, MachineConfig, StateMachine};
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

struct PendingTransition<S: State> {
    from: S,
    to: S,
    guard: Guard,
}

/// Builder for constructing state machines with a fluent API.
///
/// Unlike the imperative setup calls on [`StateMachine`], nothing is
/// resolved until [`build`](Self::build), which checks the whole setup and
/// returns every problem it finds.
///
/// # Example
///
/// ```rust
/// use statebag::builder::StateMachineBuilder;
/// use statebag::state_enum;
///
/// state_enum! {
///     enum Player {
///         Idle,
///         Running,
///     }
/// }
///
/// let mut machine = StateMachineBuilder::new()
///     .states([Player::Idle, Player::Running])
///     .transition(Player::Idle, Player::Running, |p| p.flag("moving"))
///     .transition(Player::Running, Player::Idle, |p| !p.flag("moving"))
///     .initial(Player::Idle)
///     .build()
///     .unwrap();
///
/// machine.set_property("moving", true).unwrap();
/// assert!(machine.is(&Player::Running));
/// ```
pub struct StateMachineBuilder<S: State> {
    config: MachineConfig,
    states: Vec<S>,
    transitions: Vec<PendingTransition<S>>,
    initial: Option<S>,
}

impl<S: State> StateMachineBuilder<S> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: MachineConfig::default(),
            states: Vec::new(),
            transitions: Vec::new(),
            initial: None,
        }
    }

    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a state.
    pub fn state(mut self, state: S) -> Self {
        self.states.push(state);
        self
    }

    /// Register several states, in order.
    pub fn states(mut self, states: impl IntoIterator<Item = S>) -> Self {
        self.states.extend(states);
        self
    }

    /// Declare a guarded transition.
    pub fn transition<F>(self, from: S, to: S, predicate: F) -> Self
    where
        F: Fn(&Properties) -> bool + Send + Sync + 'static,
    {
        self.guarded(from, to, Guard::new(predicate))
    }

    /// Declare an unconditional transition.
    pub fn always(self, from: S, to: S) -> Self {
        self.guarded(from, to, Guard::always())
    }

    /// Declare a transition with a prebuilt guard.
    pub fn guarded(mut self, from: S, to: S, guard: Guard) -> Self {
        self.transitions.push(PendingTransition { from, to, guard });
        self
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Check the whole setup, accumulating ALL issues.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<SetupIssue>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<SetupIssue>>> = Vec::new();
        let mut registered: HashSet<&str> = HashSet::new();

        for state in &self.states {
            let fresh = registered.insert(state.name());
            let check = if fresh || self.config.duplicate_states == DuplicatePolicy::Replace {
                Validation::success(())
            } else {
                Validation::fail(SetupIssue::DuplicateState {
                    name: state.name().to_string(),
                })
            };
            checks.push(check);
        }

        for transition in &self.transitions {
            let origin = if registered.contains(transition.from.name()) {
                Validation::success(())
            } else {
                Validation::fail(SetupIssue::UnknownOrigin {
                    name: transition.from.name().to_string(),
                })
            };
            checks.push(origin);

            let target = if registered.contains(transition.to.name()) {
                Validation::success(())
            } else {
                Validation::fail(SetupIssue::UnknownTarget {
                    from: transition.from.name().to_string(),
                    name: transition.to.name().to_string(),
                })
            };
            checks.push(target);
        }

        let initial = match &self.initial {
            None => Validation::fail(SetupIssue::MissingInitialState),
            Some(state) if !registered.contains(state.name()) => {
                Validation::fail(SetupIssue::UnknownInitial {
                    name: state.name().to_string(),
                })
            }
            Some(_) => Validation::success(()),
        };
        checks.push(initial);

        Validation::all_vec(checks).map(|_| ())
    }

    /// Build the state machine, positioned on its initial state.
    pub fn build(self) -> Result<StateMachine<S>, BuildError> {
        if let Validation::Failure(issues) = self.validate() {
            return Err(BuildError::Invalid {
                issues: issues.iter().cloned().collect(),
            });
        }

        let mut machine = StateMachine::with_config(self.config);
        for state in self.states {
            machine.add_state(state)?;
        }
        for transition in self.transitions {
            machine
                .from(&transition.from)?
                .to(&transition.to)?
                .guard(transition.guard);
        }
        if let Some(initial) = &self.initial {
            machine.set_current_state(initial)?;
        }

        Ok(machine)
    }
}

impl<S: State> Default for StateMachineBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
