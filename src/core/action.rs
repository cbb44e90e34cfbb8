//! Side-effecting callbacks run by states and transitions.

use std::fmt;
use std::rc::Rc;

/// A no-argument, no-return effect supplied by the host.
///
/// Actions are reference counted so that copying a transition (or a state)
/// shares the underlying closure instead of requiring it to be `Clone`.
/// They are deliberately not `Send`: a machine is driven from a single thread
/// and callbacks commonly capture `Rc`/`Cell` handles, including a `Weak`
/// handle to the machine itself.
///
/// # Example
///
/// ```rust
/// use switchyard::core::Action;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let hits = Rc::new(Cell::new(0));
/// let counter = Rc::clone(&hits);
/// let action = Action::new(move || counter.set(counter.get() + 1));
///
/// action.run();
/// action.clone().run();
/// assert_eq!(hits.get(), 2);
/// ```
#[derive(Clone)]
pub struct Action {
    effect: Rc<dyn Fn()>,
}

impl Action {
    /// Wrap a closure as an action.
    pub fn new<F>(effect: F) -> Self
    where
        F: Fn() + 'static,
    {
        Action {
            effect: Rc::new(effect),
        }
    }

    /// Run the effect.
    ///
    /// A panic inside the effect unwinds through the caller untouched.
    pub fn run(&self) {
        (self.effect)()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").finish_non_exhaustive()
    }
}
