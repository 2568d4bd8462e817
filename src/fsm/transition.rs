//! Guarded transitions and the chained builder that declares them.

use crate::core::{Guard, Properties, State, StateKey};
use crate::fsm::error::MachineError;
use crate::fsm::machine::StateMachine;

/// Handle of a state inside one machine's registry.
///
/// Handles are only meaningful for the machine that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateId(pub(crate) usize);

impl StateId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A directed edge between two registered states, active only while its
/// guard passes.
///
/// Both ends are resolved to handles when the transition is declared, so
/// evaluation never looks a name up.
#[derive(Debug)]
pub struct Transition {
    pub(crate) from: StateId,
    pub(crate) to: StateId,
    pub(crate) guard: Guard,
}

impl Transition {
    pub fn from(&self) -> StateId {
        self.from
    }

    pub fn to(&self) -> StateId {
        self.to
    }

    pub fn is_unconditional(&self) -> bool {
        self.guard.is_unconditional()
    }

    /// Check whether this transition fires for the given bag snapshot (pure)
    pub fn can_fire(&self, props: &Properties) -> bool {
        self.guard.check(props)
    }
}

/// First half of a transition declaration: the origin is known.
///
/// Created by [`StateMachine::from`]. Nothing is attached to the machine
/// until the declaration is completed with [`BoundTransition::when`],
/// [`BoundTransition::always`] or [`BoundTransition::guard`].
#[must_use = "call .to(state) and then .when(..) or .always() to attach the transition"]
pub struct TransitionBuilder<'m, S: State> {
    machine: &'m mut StateMachine<S>,
    from: StateId,
}

impl<'m, S: State> TransitionBuilder<'m, S> {
    pub(crate) fn new(machine: &'m mut StateMachine<S>, from: StateId) -> Self {
        Self { machine, from }
    }

    /// Bind the destination state, resolved against the registry now.
    pub fn to<K>(self, key: &K) -> Result<BoundTransition<'m, S>, MachineError>
    where
        K: StateKey + ?Sized,
    {
        let to = self.machine.resolve(key)?;
        Ok(BoundTransition {
            machine: self.machine,
            from: self.from,
            to,
        })
    }
}

/// A transition with both ends bound, waiting for its guard.
#[must_use = "call .when(..) or .always() to attach the transition"]
pub struct BoundTransition<'m, S: State> {
    machine: &'m mut StateMachine<S>,
    from: StateId,
    to: StateId,
}

impl<'m, S: State> BoundTransition<'m, S> {
    /// Attach the transition with a guard over the property bag.
    pub fn when<F>(self, predicate: F) -> &'m mut StateMachine<S>
    where
        F: Fn(&Properties) -> bool + Send + Sync + 'static,
    {
        self.guard(Guard::new(predicate))
    }

    /// Attach the transition without a guard.
    ///
    /// It fires as soon as its origin is current and a pass runs, so it
    /// must be declared last among its origin's transitions.
    pub fn always(self) -> &'m mut StateMachine<S> {
        self.guard(Guard::always())
    }

    /// Attach the transition with a prebuilt guard.
    pub fn guard(self, guard: Guard) -> &'m mut StateMachine<S> {
        self.machine.attach(Transition {
            from: self.from,
            to: self.to,
            guard,
        });
        self.machine
    }
}
