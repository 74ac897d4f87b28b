//! Generic finite state machine keyed by state name.
//!
//! A [`StateMachine`] owns a registry of state factories identified by a
//! string label such as `"survey"` or `"walk"`, and at most one live state
//! instance. States implement [`MachineState`]:
//!
//! - `enter` – called once when the state becomes current, with the state it
//!   replaced (`None` only on the very first activation)
//! - `update` – called every frame while current; returns the name of the
//!   state it wants next, if any
//! - `exit` – called once when the state is replaced
//!
//! States never hold a reference to the machine. A transition request is a
//! return value which the machine applies itself, so there is no ownership
//! cycle between the two.
//!
//! # Transition protocol
//!
//! [`StateMachine::set_state`] with the current name is a no-op. Otherwise the
//! factory is looked up first (an unknown name fails with
//! [`LocomotionError::UnknownState`] and leaves everything untouched), then
//! the old state's `exit` runs, the new instance is built, stored as current
//! and its `enter` runs, all within the same call.
//!
//! # Example
//!
//! ```ignore
//! let mut machine = StateMachine::new();
//! machine.add_state("survey", || LocomotionState::Survey);
//! machine.add_state("walk", || LocomotionState::Walk);
//! machine.set_state("survey", &mut mixer)?;
//! machine.update(dt, &keys, &mut mixer)?;
//! ```

use rustc_hash::FxHashMap;
use std::fmt;

use crate::error::LocomotionError;

/// Behaviour shared by every state a [`StateMachine`] can hold.
pub trait MachineState: Sized {
    /// Per-frame input snapshot handed to [`MachineState::update`].
    type Input;
    /// Mutable collaborator shared by all states (e.g. an animation mixer).
    type Context;

    /// Registry name of this state.
    fn name(&self) -> &'static str;

    /// Called once when the state becomes current.
    ///
    /// `previous` is the state being replaced. Its `exit` has already run.
    fn enter(
        &mut self,
        previous: Option<&Self>,
        ctx: &mut Self::Context,
    ) -> Result<(), LocomotionError>;

    /// Called once when the state is replaced.
    fn exit(&mut self, ctx: &mut Self::Context);

    /// Called every frame while the state is current.
    ///
    /// Return `Some(name)` to request a transition to `name`.
    fn update(
        &mut self,
        dt: f32,
        input: &Self::Input,
        ctx: &mut Self::Context,
    ) -> Option<&'static str>;
}

/// Factory building a fresh state instance on every transition.
pub type StateFactory<S> = fn() -> S;

/// A transition that was applied by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// State that was exited, `None` on the first activation.
    pub from: Option<&'static str>,
    /// State that was entered.
    pub to: &'static str,
}

/// Name-keyed state registry with a single active state.
pub struct StateMachine<S: MachineState> {
    factories: FxHashMap<String, StateFactory<S>>,
    current: Option<S>,
}

impl<S: MachineState> Default for StateMachine<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: MachineState> StateMachine<S> {
    /// Create an empty machine with no registered states and no current state.
    pub fn new() -> Self {
        Self {
            factories: FxHashMap::default(),
            current: None,
        }
    }

    /// Register a factory under `name`. Registering the same name twice
    /// replaces the earlier factory.
    pub fn add_state(&mut self, name: impl Into<String>, factory: StateFactory<S>) {
        self.factories.insert(name.into(), factory);
    }

    /// Builder form of [`StateMachine::add_state`].
    pub fn with_state(mut self, name: impl Into<String>, factory: StateFactory<S>) -> Self {
        self.add_state(name, factory);
        self
    }

    /// The live state, if any.
    pub fn current(&self) -> Option<&S> {
        self.current.as_ref()
    }

    /// Name of the live state, if any.
    pub fn current_name(&self) -> Option<&'static str> {
        self.current.as_ref().map(|s| s.name())
    }

    /// Make `name` the current state.
    ///
    /// Returns `Ok(None)` when `name` is already current, and the applied
    /// [`Transition`] otherwise. If the new state's `enter` fails, the previous
    /// state is put back as current and the error is returned.
    pub fn set_state(
        &mut self,
        name: &str,
        ctx: &mut S::Context,
    ) -> Result<Option<Transition>, LocomotionError> {
        if self.current_name() == Some(name) {
            return Ok(None);
        }

        let factory = *self
            .factories
            .get(name)
            .ok_or_else(|| LocomotionError::UnknownState(name.to_string()))?;

        let mut previous = self.current.take();
        if let Some(prev) = previous.as_mut() {
            prev.exit(ctx);
        }

        let state = self.current.insert(factory());
        let to = state.name();
        if let Err(err) = state.enter(previous.as_ref(), ctx) {
            self.current = previous;
            return Err(err);
        }

        Ok(Some(Transition {
            from: previous.as_ref().map(|s| s.name()),
            to,
        }))
    }

    /// Run the current state's `update` and apply the transition it asks for.
    ///
    /// No-op without a current state.
    pub fn update(
        &mut self,
        dt: f32,
        input: &S::Input,
        ctx: &mut S::Context,
    ) -> Result<Option<Transition>, LocomotionError> {
        let Some(state) = self.current.as_mut() else {
            return Ok(None);
        };
        match state.update(dt, input, ctx) {
            Some(next) => self.set_state(next, ctx),
            None => Ok(None),
        }
    }
}

impl<S: MachineState> fmt::Debug for StateMachine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current_name())
            .field("states", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
