//! Builder API for ergonomic transition construction.
//!
//! This module provides a fluent builder and shorthand constructors for the
//! most common transition shapes.

pub mod error;
pub mod transition;

pub use error::BuildError;
pub use transition::TransitionBuilder;

use crate::core::{Event, StateId};
use crate::runtime::Transition;

/// Create an unconditional transition without actions.
///
/// # Example
///
/// ```
/// use switchyard::builder::simple_transition;
/// use switchyard::core::State;
/// use switchyard::runtime::Machine;
///
/// let machine = Machine::new();
/// let red = machine.add_state(State::named("red"));
/// let green = machine.add_state(State::named("green"));
///
/// machine.register(simple_transition(red, green, "tick")).unwrap();
/// ```
pub fn simple_transition<E: Event>(from: StateId, to: StateId, event: E) -> Transition<E> {
    Transition::new(from, to, event)
}

/// Create a transition with a guard predicate.
///
/// # Example
///
/// ```
/// use switchyard::builder::guarded_transition;
/// use switchyard::core::State;
/// use switchyard::runtime::Machine;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let remaining = Rc::new(Cell::new(3u32));
/// let reader = Rc::clone(&remaining);
///
/// let machine = Machine::new();
/// let typing = machine.add_state(State::named("typing"));
///
/// machine
///     .register(guarded_transition(typing, typing, 'k', move || reader.get() > 0))
///     .unwrap();
/// ```
pub fn guarded_transition<E, F>(from: StateId, to: StateId, event: E, guard: F) -> Transition<E>
where
    E: Event,
    F: Fn() -> bool + 'static,
{
    Transition::new(from, to, event).guard_is(guard)
}
