//! Property-driven state machine.

use crate::core::{Properties, PropertyValue, State, StateHistory, StateKey, StateTransition};
use crate::fsm::config::{DuplicatePolicy, MachineConfig};
use crate::fsm::error::MachineError;
use crate::fsm::transition::{StateId, Transition, TransitionBuilder};
use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, trace, warn};

#[derive(Debug)]
pub(crate) struct StateNode<S: State> {
    pub(crate) state: S,
    pub(crate) transitions: Vec<Transition>,
}

/// A finite state machine whose transitions are driven by a property bag.
///
/// Setup registers states and declares guarded transitions; every property
/// update then runs one evaluation pass over the current state's
/// transitions in declaration order, switching on the first guard that
/// passes.
///
/// # Example
///
/// ```rust
/// use statebag::fsm::StateMachine;
///
/// let mut machine: StateMachine<String> = StateMachine::new();
/// machine
///     .add_state("Idle".to_string())?
///     .add_state("Running".to_string())?;
///
/// machine
///     .from("Idle")?
///     .to("Running")?
///     .when(|p| p.number("velocity_x").is_some_and(|v| v != 0.0));
/// machine
///     .from("Running")?
///     .to("Idle")?
///     .when(|p| p.number("velocity_x") == Some(0.0));
///
/// machine.set_current_state("Idle")?;
///
/// machine.set_property("velocity_x", 5)?;
/// assert!(machine.is("Running"));
///
/// machine.set_property("velocity_x", 0)?;
/// assert!(machine.is("Idle"));
/// # Ok::<(), statebag::fsm::MachineError>(())
/// ```
#[derive(Debug)]
pub struct StateMachine<S: State> {
    pub(crate) states: Vec<StateNode<S>>,
    pub(crate) index: HashMap<String, StateId>,
    pub(crate) current: Option<StateId>,
    pub(crate) properties: Properties,
    pub(crate) history: StateHistory<S>,
    pub(crate) passes: u64,
    config: MachineConfig,
}

impl<S: State> Default for StateMachine<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateMachine<S> {
    /// Create an empty machine with the default configuration
    pub fn new() -> Self {
        Self::with_config(MachineConfig::default())
    }

    pub fn with_config(config: MachineConfig) -> Self {
        let history = match config.history_limit {
            Some(limit) => StateHistory::bounded(limit),
            None => StateHistory::new(),
        };
        Self {
            states: Vec::new(),
            index: HashMap::new(),
            current: None,
            properties: Properties::new(),
            history,
            passes: 0,
            config,
        }
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Register a state.
    ///
    /// A name that is already registered is rejected, unless the machine is
    /// configured with [`DuplicatePolicy::Replace`], in which case the
    /// previous state is overwritten and its outbound transitions dropped.
    pub fn add_state(&mut self, state: S) -> Result<&mut Self, MachineError> {
        if let Some(&id) = self.index.get(state.name()) {
            match self.config.duplicate_states {
                DuplicatePolicy::Reject => {
                    return Err(MachineError::DuplicateState {
                        name: state.name().to_string(),
                    });
                }
                DuplicatePolicy::Replace => {
                    let node = &mut self.states[id.0];
                    warn!(
                        state = state.name(),
                        dropped_transitions = node.transitions.len(),
                        "Replacing already registered state"
                    );
                    node.state = state;
                    node.transitions.clear();
                    return Ok(self);
                }
            }
        }

        let id = StateId(self.states.len());
        self.index.insert(state.name().to_string(), id);
        self.states.push(StateNode {
            state,
            transitions: Vec::new(),
        });
        Ok(self)
    }

    /// Begin declaring a transition out of a registered state.
    pub fn from<K>(&mut self, key: &K) -> Result<TransitionBuilder<'_, S>, MachineError>
    where
        K: StateKey + ?Sized,
    {
        let from = self.resolve(key)?;
        Ok(TransitionBuilder::new(self, from))
    }

    /// Set the current state without running an evaluation pass.
    pub fn set_current_state<K>(&mut self, key: &K) -> Result<&mut Self, MachineError>
    where
        K: StateKey + ?Sized,
    {
        let id = self.resolve(key)?;
        debug!(state = key.state_name(), "Current state set");
        self.current = Some(id);
        Ok(self)
    }

    /// Set one property, then run one evaluation pass.
    pub fn set_property(
        &mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Result<&mut Self, MachineError> {
        self.require_current()?;
        self.write_property(key.into(), value.into());
        self.evaluate()?;
        Ok(self)
    }

    /// Set every given property, then run exactly one evaluation pass.
    ///
    /// Guards see the bag with the whole batch applied.
    pub fn set_properties<I, K, V>(&mut self, entries: I) -> Result<&mut Self, MachineError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<PropertyValue>,
    {
        self.require_current()?;
        for (key, value) in entries {
            self.write_property(key.into(), value.into());
        }
        self.evaluate()?;
        Ok(self)
    }

    /// Run one evaluation pass against the current bag.
    ///
    /// Returns whether the current state changed. At most one transition
    /// fires per pass.
    pub fn evaluate(&mut self) -> Result<bool, MachineError> {
        let current = self.require_current()?;
        self.passes += 1;

        let next = self.states[current.0]
            .transitions
            .iter()
            .find(|t| t.can_fire(&self.properties))
            .map(Transition::to);

        match next {
            Some(to) => {
                self.switch(current, to);
                Ok(true)
            }
            None => {
                trace!(
                    state = self.states[current.0].state.name(),
                    pass = self.passes,
                    "No transition matched"
                );
                Ok(false)
            }
        }
    }

    /// True iff the current state has the given name.
    ///
    /// Always false before a current state is set.
    pub fn is<K>(&self, key: &K) -> bool
    where
        K: StateKey + ?Sized,
    {
        self.current
            .is_some_and(|id| self.states[id.0].state.name() == key.state_name())
    }

    pub fn is_one_of<K>(&self, keys: &[&K]) -> bool
    where
        K: StateKey + ?Sized,
    {
        keys.iter().any(|key| self.is(*key))
    }

    pub fn current_state(&self) -> Result<&S, MachineError> {
        let id = self.require_current()?;
        Ok(&self.states[id.0].state)
    }

    pub fn current_state_name(&self) -> Result<&str, MachineError> {
        self.current_state().map(State::name)
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Registered states in registration order.
    pub fn states(&self) -> impl Iterator<Item = &S> + '_ {
        self.states.iter().map(|node| &node.state)
    }

    pub fn state(&self, id: StateId) -> Option<&S> {
        self.states.get(id.0).map(|node| &node.state)
    }

    pub fn state_id<K>(&self, key: &K) -> Option<StateId>
    where
        K: StateKey + ?Sized,
    {
        self.index.get(key.state_name()).copied()
    }

    pub fn contains_state<K>(&self, key: &K) -> bool
    where
        K: StateKey + ?Sized,
    {
        self.state_id(key).is_some()
    }

    /// Transitions declared out of a state, in evaluation order.
    pub fn transitions<K>(&self, key: &K) -> Result<&[Transition], MachineError>
    where
        K: StateKey + ?Sized,
    {
        let id = self.resolve(key)?;
        Ok(&self.states[id.0].transitions)
    }

    pub fn transition_count<K>(&self, key: &K) -> Result<usize, MachineError>
    where
        K: StateKey + ?Sized,
    {
        self.transitions(key).map(<[Transition]>::len)
    }

    pub fn history(&self) -> &StateHistory<S> {
        &self.history
    }

    pub fn last_transition(&self) -> Option<&StateTransition<S>> {
        self.history.last()
    }

    /// Number of evaluation passes run so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub(crate) fn resolve<K>(&self, key: &K) -> Result<StateId, MachineError>
    where
        K: StateKey + ?Sized,
    {
        self.state_id(key)
            .ok_or_else(|| MachineError::unknown(key.state_name()))
    }

    pub(crate) fn attach(&mut self, transition: Transition) {
        let to_name = self.states[transition.to.0].state.name().to_string();
        let node = &mut self.states[transition.from.0];
        if node.transitions.iter().any(Transition::is_unconditional) {
            warn!(
                from = node.state.name(),
                to = to_name.as_str(),
                "Transition declared after an unconditional transition can never fire"
            );
        }
        trace!(from = node.state.name(), to = to_name.as_str(), "Transition attached");
        node.transitions.push(transition);
    }

    fn require_current(&self) -> Result<StateId, MachineError> {
        self.current.ok_or(MachineError::NoCurrentState)
    }

    fn write_property(&mut self, key: String, value: PropertyValue) {
        trace!(key = key.as_str(), value = %value, "Property set");
        self.properties.insert(key, value);
    }

    fn switch(&mut self, from: StateId, to: StateId) {
        let from_state = self.states[from.0].state.clone();
        let to_state = self.states[to.0].state.clone();
        debug!(
            from = from_state.name(),
            to = to_state.name(),
            pass = self.passes,
            "State transition"
        );
        self.history.push(StateTransition {
            from: from_state,
            to: to_state,
            timestamp: Utc::now(),
            pass: self.passes,
        });
        self.current = Some(to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_enum;

    state_enum! {
        enum Player {
            Idle,
            Running,
            Crouched,
            Jumping,
        }
    }

    fn player_machine() -> StateMachine<Player> {
        let mut machine = StateMachine::new();
        machine
            .add_state(Player::Idle)
            .unwrap()
            .add_state(Player::Running)
            .unwrap()
            .add_state(Player::Crouched)
            .unwrap()
            .add_state(Player::Jumping)
            .unwrap();
        machine
    }

    #[test]
    fn velocity_drives_idle_and_running() {
        let mut machine = player_machine();
        machine
            .from(&Player::Idle)
            .unwrap()
            .to(&Player::Running)
            .unwrap()
            .when(|p| p.number("velocity_x").is_some_and(|v| v != 0.0));
        machine
            .from(&Player::Running)
            .unwrap()
            .to(&Player::Idle)
            .unwrap()
            .when(|p| p.number("velocity_x") == Some(0.0));
        machine.set_current_state(&Player::Idle).unwrap();

        machine.set_property("velocity_x", 5).unwrap();
        assert_eq!(machine.current_state().unwrap(), &Player::Running);

        machine.set_property("velocity_x", 0).unwrap();
        assert_eq!(machine.current_state().unwrap(), &Player::Idle);
        assert_eq!(machine.history().len(), 2);
    }

    #[test]
    fn first_matching_transition_wins() {
        let mut machine = player_machine();
        machine
            .from("Idle")
            .unwrap()
            .to("Jumping")
            .unwrap()
            .when(|p| p.flag("jump_pressed"));
        machine
            .from("Idle")
            .unwrap()
            .to("Crouched")
            .unwrap()
            .when(|p| p.flag("jump_pressed"));
        machine.set_current_state("Idle").unwrap();

        machine.set_property("jump_pressed", true).unwrap();
        assert!(machine.is("Jumping"));
    }

    #[test]
    fn one_switch_per_update() {
        let mut machine = player_machine();
        machine.from("Idle").unwrap().to("Running").unwrap().always();
        machine.from("Running").unwrap().to("Jumping").unwrap().always();
        machine.set_current_state("Idle").unwrap();

        machine.set_property("tick", 1).unwrap();
        assert!(machine.is("Running"));

        machine.set_property("tick", 2).unwrap();
        assert!(machine.is("Jumping"));
    }

    #[test]
    fn batch_update_runs_a_single_pass_over_combined_values() {
        let mut machine = player_machine();
        machine
            .from("Idle")
            .unwrap()
            .to("Crouched")
            .unwrap()
            .when(|p| p.flag("on_floor") && p.flag("crouch_pressed"));
        machine.set_current_state("Idle").unwrap();

        machine
            .set_properties([("on_floor", true), ("crouch_pressed", true)])
            .unwrap();

        assert!(machine.is("Crouched"));
        assert_eq!(machine.passes(), 1);
    }

    #[test]
    fn no_match_leaves_state_unchanged() {
        let mut machine = player_machine();
        machine
            .from("Idle")
            .unwrap()
            .to("Running")
            .unwrap()
            .when(|p| p.flag("moving"));
        machine.set_current_state("Idle").unwrap();

        assert!(!machine.evaluate().unwrap());
        machine.set_property("moving", false).unwrap();

        assert_eq!(machine.current_state_name().unwrap(), "Idle");
        assert!(machine.history().is_empty());
    }

    #[test]
    fn properties_persist_across_transitions() {
        let mut machine = player_machine();
        machine.from("Idle").unwrap().to("Running").unwrap().always();
        machine.set_current_state("Idle").unwrap();

        machine.set_property("facing", "left").unwrap();

        assert!(machine.is("Running"));
        assert_eq!(machine.properties().text("facing"), Some("left"));
    }

    #[test]
    fn duplicate_states_are_rejected_by_default() {
        let mut machine = player_machine();
        let result = machine.add_state(Player::Idle);

        assert_eq!(
            result.err(),
            Some(MachineError::DuplicateState {
                name: "Idle".to_string()
            })
        );
        assert_eq!(machine.states().count(), 4);
    }

    #[test]
    fn replace_policy_overwrites_state_and_drops_transitions() {
        let config = MachineConfig::default().duplicate_states(DuplicatePolicy::Replace);
        let mut machine: StateMachine<String> = StateMachine::with_config(config);
        machine
            .add_state("Idle".to_string())
            .unwrap()
            .add_state("Running".to_string())
            .unwrap();
        machine.from("Idle").unwrap().to("Running").unwrap().always();

        machine.add_state("Idle".to_string()).unwrap();

        assert_eq!(machine.states().count(), 2);
        assert_eq!(machine.transition_count("Idle").unwrap(), 0);
    }

    #[test]
    fn unknown_names_are_rejected_without_changing_current_state() {
        let mut machine = player_machine();
        machine.set_current_state("Idle").unwrap();

        assert!(matches!(
            machine.from("Sliding"),
            Err(MachineError::UnknownState { .. })
        ));
        assert!(matches!(
            machine.set_current_state("Sliding"),
            Err(MachineError::UnknownState { .. })
        ));
        assert!(machine.is("Idle"));
    }

    #[test]
    fn evaluation_requires_a_current_state() {
        let mut machine = player_machine();

        assert_eq!(machine.current_state_name(), Err(MachineError::NoCurrentState));
        assert_eq!(machine.evaluate(), Err(MachineError::NoCurrentState));
        assert!(matches!(
            machine.set_property("velocity_x", 1),
            Err(MachineError::NoCurrentState)
        ));
        assert!(matches!(
            machine.set_properties([("on_floor", true)]),
            Err(MachineError::NoCurrentState)
        ));
        assert!(machine.properties().is_empty());
        assert!(!machine.is("Idle"));
    }

    #[test]
    fn is_one_of_matches_any_listed_state() {
        let mut machine = player_machine();
        machine.set_current_state(&Player::Crouched).unwrap();

        assert!(machine.is_one_of(&["Idle", "Crouched"]));
        assert!(!machine.is_one_of(&["Idle", "Running", "Jumping"]));
        assert!(machine.is_one_of(&[&Player::Crouched]));
        assert!(!machine.is_one_of::<str>(&[]));
    }

    #[test]
    fn self_transition_is_recorded() {
        let mut machine = player_machine();
        machine
            .from("Jumping")
            .unwrap()
            .to("Jumping")
            .unwrap()
            .when(|p| p.flag("double_jump"));
        machine.set_current_state("Jumping").unwrap();

        machine.set_property("double_jump", true).unwrap();

        let last = machine.last_transition().unwrap();
        assert_eq!(last.from, Player::Jumping);
        assert_eq!(last.to, Player::Jumping);
        assert_eq!(last.pass, 1);
    }

    #[test]
    fn history_respects_configured_limit() {
        let config = MachineConfig::default().history_limit(Some(1));
        let mut machine: StateMachine<String> = StateMachine::with_config(config);
        machine
            .add_state("A".to_string())
            .unwrap()
            .add_state("B".to_string())
            .unwrap();
        machine.from("A").unwrap().to("B").unwrap().always();
        machine.from("B").unwrap().to("A").unwrap().always();
        machine.set_current_state("A").unwrap();

        for tick in 0..5 {
            machine.set_property("tick", tick).unwrap();
        }

        assert_eq!(machine.history().len(), 1);
        assert_eq!(machine.last_transition().unwrap().pass, 5);
    }

    fn exploding_machine() -> StateMachine<Player> {
        let mut machine = player_machine();
        machine
            .from("Idle")
            .unwrap()
            .to("Jumping")
            .unwrap()
            .when(|p| {
                if p.contains("gravity") {
                    panic!("gravity guard failed");
                }
                false
            });
        machine.set_current_state("Idle").unwrap();
        machine
    }

    #[test]
    #[should_panic(expected = "gravity guard failed")]
    fn guard_panic_reaches_the_caller() {
        let mut machine = exploding_machine();
        let _ = machine.set_property("gravity", 9.8);
    }

    #[test]
    fn guard_panic_leaves_state_and_keeps_written_values() {
        use std::panic::{catch_unwind, AssertUnwindSafe};

        let mut machine = exploding_machine();
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let _ = machine.set_properties([("on_floor", true)]);
            let _ = machine.set_property("gravity", 9.8);
        }));

        assert!(outcome.is_err());
        assert!(machine.is("Idle"));
        assert!(machine.history().is_empty());
        assert_eq!(machine.properties().number("gravity"), Some(9.8));
        assert!(machine.properties().flag("on_floor"));
    }
}
