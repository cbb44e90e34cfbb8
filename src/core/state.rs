//! States and the handles that identify them.
//!
//! A [`State`] is a passive record: an optional entry effect, an optional exit
//! effect and an optional diagnostic name. It is configured fluently and then
//! handed to a machine, which stores it in an arena and returns a [`StateId`].
//! Transitions and the dispatch table refer to states only through these
//! handles, so identity is the handle, never the name or the callbacks.

use crate::core::action::Action;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a state stored in a machine's arena.
///
/// Handles are cheap to copy and stable for the lifetime of the machine that
/// issued them. They are only meaningful for that machine.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct StateId(usize);

impl StateId {
    pub(crate) fn new(index: usize) -> Self {
        StateId(index)
    }

    /// Position of the state in the arena, in insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An execution point with optional entry and exit effects.
///
/// Nothing prevents a state from being entered or left several times in a
/// row; sequencing is the machine's job.
///
/// # Example
///
/// ```rust
/// use switchyard::core::State;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let entered = Rc::new(Cell::new(false));
/// let flag = Rc::clone(&entered);
///
/// let idle = State::named("idle").on_enter(move || flag.set(true));
///
/// assert_eq!(idle.name(), Some("idle"));
/// idle.enter();
/// idle.leave(); // no exit effect attached: no-op
/// assert!(entered.get());
/// ```
#[derive(Clone, Default, Debug)]
pub struct State {
    name: Option<String>,
    on_enter: Option<Action>,
    on_leave: Option<Action>,
}

impl State {
    /// Create an anonymous state with no effects.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state carrying a name for diagnostics.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Attach the entry effect, replacing any previous one.
    pub fn on_enter<F>(mut self, effect: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.on_enter = Some(Action::new(effect));
        self
    }

    /// Attach the exit effect, replacing any previous one.
    pub fn on_leave<F>(mut self, effect: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.on_leave = Some(Action::new(effect));
        self
    }

    /// Diagnostic name, if one was given.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Run the entry effect if one is attached.
    pub fn enter(&self) {
        if let Some(effect) = &self.on_enter {
            effect.run();
        }
    }

    /// Run the exit effect if one is attached.
    pub fn leave(&self) {
        if let Some(effect) = &self.on_leave {
            effect.run();
        }
    }
}
