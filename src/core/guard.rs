//! Guard predicates for controlling state transitions.
//!
//! A guard decides whether a candidate transition may fire. Guards are
//! evaluated eagerly, in registration order, while the machine looks for the
//! first transition that accepts an event. Nothing stops a guard from having
//! side effects; the machine simply calls it once per evaluation.

use std::fmt;
use std::rc::Rc;

/// Predicate that determines if a transition can execute.
///
/// # Example
///
/// ```rust
/// use switchyard::core::Guard;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let remaining = Rc::new(Cell::new(2u32));
/// let seen = Rc::clone(&remaining);
/// let keys_remaining = Guard::new(move || seen.get() > 0);
///
/// assert!(keys_remaining.check());
/// remaining.set(0);
/// assert!(!keys_remaining.check());
/// assert!(keys_remaining.negate().check());
/// ```
#[derive(Clone)]
pub struct Guard {
    predicate: Rc<dyn Fn() -> bool>,
}

impl Guard {
    /// Create a guard from a predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        Guard {
            predicate: Rc::new(predicate),
        }
    }

    /// Evaluate the predicate.
    pub fn check(&self) -> bool {
        (self.predicate)()
    }

    /// Guard that accepts exactly when `self` rejects.
    ///
    /// Both guards share the same predicate, so side effects inside it run
    /// once per evaluation of either.
    pub fn negate(&self) -> Guard {
        let inner = Rc::clone(&self.predicate);
        Guard::new(move || !inner())
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}
