//! Ordered multi-map from (event, source state) to candidate transitions.

use crate::core::{Event, StateId};
use crate::runtime::transition::Transition;
use std::collections::HashMap;
use std::rc::Rc;

/// Transition table keyed by event and source state.
///
/// Every key maps to an append-only list, so candidates come back in the
/// order they were inserted. The order is what breaks ties between several
/// transitions sharing a key: the first one whose guard passes wins.
pub(crate) struct TransitionTable<E: Event> {
    slots: HashMap<(E, StateId), Vec<Rc<Transition<E>>>>,
    len: usize,
}

impl<E: Event> TransitionTable<E> {
    pub(crate) fn new() -> Self {
        Self {
            slots: HashMap::new(),
            len: 0,
        }
    }

    pub(crate) fn insert(&mut self, transition: Transition<E>) {
        let key = (transition.event().clone(), transition.from());
        self.slots
            .entry(key)
            .or_default()
            .push(Rc::new(transition));
        self.len += 1;
    }

    /// Snapshot of the candidates for a key, in insertion order.
    ///
    /// The returned list does not borrow the table, so host callbacks run
    /// while walking it are free to touch the machine again.
    pub(crate) fn candidates(&self, event: &E, from: StateId) -> Vec<Rc<Transition<E>>> {
        self.slots
            .get(&(event.clone(), from))
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }
}
