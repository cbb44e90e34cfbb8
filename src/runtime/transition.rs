//! Transitions between states.

use crate::core::{Action, Event, Guard, StateId};

/// An edge from one state to another, triggered by an event.
///
/// A transition carries an optional guard and an ordered list of actions.
/// Copies share their callbacks, so registering the same transition into
/// several machines (or cloning it before registration) is cheap.
///
/// # Example
///
/// ```rust
/// use switchyard::core::State;
/// use switchyard::runtime::{Machine, Transition};
///
/// let machine = Machine::new();
/// let locked = machine.add_state(State::named("locked"));
/// let open = machine.add_state(State::named("open"));
///
/// let unlock = Transition::new(locked, open, 'c')
///     .guard_is(|| true)
///     .add_action(|| println!("coin accepted"));
///
/// assert_eq!(unlock.from(), locked);
/// assert_eq!(unlock.to(), open);
/// assert_eq!(unlock.event(), &'c');
/// assert_eq!(unlock.action_count(), 1);
///
/// machine.register(unlock).unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct Transition<E: Event> {
    from: StateId,
    to: StateId,
    event: E,
    guard: Option<Guard>,
    actions: Vec<Action>,
}

impl<E: Event> Transition<E> {
    /// Create an unguarded transition with no actions.
    pub fn new(from: StateId, to: StateId, event: E) -> Self {
        Self {
            from,
            to,
            event,
            guard: None,
            actions: Vec::new(),
        }
    }

    /// Attach the guard, replacing any previous one.
    pub fn guard_is<F>(self, predicate: F) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        self.with_guard(Guard::new(predicate))
    }

    /// Attach an already-built guard, replacing any previous one.
    pub fn with_guard(mut self, guard: Guard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Append an action. Actions run in the order they were added.
    pub fn add_action<F>(self, effect: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.with_action(Action::new(effect))
    }

    /// Append an already-built action.
    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub fn from(&self) -> StateId {
        self.from
    }

    pub fn to(&self) -> StateId {
        self.to
    }

    pub fn event(&self) -> &E {
        &self.event
    }

    pub fn has_guard(&self) -> bool {
        self.guard.is_some()
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// Whether the transition may fire right now.
    ///
    /// Always true for an unguarded transition; otherwise the guard's result.
    pub fn guard_passes(&self) -> bool {
        self.guard.as_ref().is_none_or(Guard::check)
    }

    /// Run every action in declaration order.
    pub fn invoke_actions(&self) {
        for action in &self.actions {
            action.run();
        }
    }
}
