//! Builder for constructing state transitions.

use crate::builder::error::BuildError;
use crate::core::{Action, Event, Guard, StateId};
use crate::runtime::Transition;

/// Builder for constructing transitions with a fluent API.
///
/// Unlike [`Transition::new`], the builder lets the endpoints and the event be
/// supplied in any order and reports what is missing when it is built.
///
/// # Example
///
/// ```rust
/// use switchyard::builder::TransitionBuilder;
/// use switchyard::core::State;
/// use switchyard::runtime::Machine;
///
/// let machine = Machine::new();
/// let idle = machine.add_state(State::named("idle"));
/// let busy = machine.add_state(State::named("busy"));
///
/// let transition = TransitionBuilder::new()
///     .on("job")
///     .from(idle)
///     .to(busy)
///     .when(|| true)
///     .then(|| println!("picked up a job"))
///     .build()
///     .unwrap();
///
/// machine.register(transition).unwrap();
/// ```
pub struct TransitionBuilder<E: Event> {
    from: Option<StateId>,
    to: Option<StateId>,
    event: Option<E>,
    guard: Option<Guard>,
    actions: Vec<Action>,
}

impl<E: Event> TransitionBuilder<E> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            from: None,
            to: None,
            event: None,
            guard: None,
            actions: Vec::new(),
        }
    }

    /// Set the source state (required).
    pub fn from(mut self, state: StateId) -> Self {
        self.from = Some(state);
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: StateId) -> Self {
        self.to = Some(state);
        self
    }

    /// Set the triggering event (required).
    pub fn on(mut self, event: E) -> Self {
        self.event = Some(event);
        self
    }

    /// Set the guard (optional, last call wins).
    pub fn guard(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Set the guard using a closure (optional, last call wins).
    pub fn when<F>(self, predicate: F) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        self.guard(Guard::new(predicate))
    }

    /// Append an action (optional, accumulates in order).
    pub fn action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Append an action using a closure (optional, accumulates in order).
    pub fn then<F>(self, effect: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.action(Action::new(effect))
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition<E>, BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;
        let event = self.event.ok_or(BuildError::MissingEvent)?;

        let transition = Transition::new(from, to, event);
        let transition = match self.guard {
            Some(guard) => transition.with_guard(guard),
            None => transition,
        };
        Ok(self
            .actions
            .into_iter()
            .fold(transition, Transition::with_action))
    }
}

impl<E: Event> Default for TransitionBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}
