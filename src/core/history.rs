//! State transition history tracking.
//!
//! When enabled through [`MachineConfig`](crate::runtime::MachineConfig), a
//! machine appends one [`TransitionRecord`] per committed transition. The log
//! can be bounded, in which case the oldest records are evicted first.

use crate::core::state::StateId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single committed transition.
///
/// `depth` is the number of `notify` dispatches on the call stack when the
/// transition committed: `1` for a top-level call, `2` for a transition
/// triggered from inside another transition's callbacks, and so on.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord<E> {
    /// The state being left
    pub from: StateId,
    /// The state being entered
    pub to: StateId,
    /// The event that selected the transition
    pub event: E,
    /// Dispatch nesting depth at commit time
    pub depth: usize,
    /// When the current-state pointer moved
    pub timestamp: DateTime<Utc>,
}

/// Ordered, optionally bounded, log of committed transitions.
///
/// A deserialized log never holds more than its capacity: surplus records
/// are dropped oldest first, as if they had been evicted while recording.
///
/// # Example
///
/// ```rust
/// use switchyard::core::{State, TransitionLog};
/// use switchyard::runtime::{Machine, MachineConfig, Transition};
///
/// let machine = Machine::with_config(MachineConfig::default().record_history(true));
/// let start = machine.add_state(State::named("start"));
/// let middle = machine.add_state(State::named("middle"));
/// let end = machine.add_state(State::named("end"));
///
/// machine.register(Transition::new(start, middle, 'a')).unwrap();
/// machine.register(Transition::new(middle, end, 'b')).unwrap();
///
/// machine.start(start).unwrap();
/// machine.notify('a');
/// machine.notify('b');
///
/// let history: TransitionLog<char> = machine.history();
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.path(), vec![start, middle, end]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "StoredLog<E>")]
pub struct TransitionLog<E> {
    records: VecDeque<TransitionRecord<E>>,
    capacity: Option<usize>,
}

/// Wire form of a [`TransitionLog`], trimmed to capacity on the way in.
#[derive(Deserialize)]
struct StoredLog<E> {
    records: VecDeque<TransitionRecord<E>>,
    capacity: Option<usize>,
}

impl<E> From<StoredLog<E>> for TransitionLog<E> {
    fn from(stored: StoredLog<E>) -> Self {
        let StoredLog {
            mut records,
            capacity,
        } = stored;
        if let Some(capacity) = capacity {
            let surplus = records.len().saturating_sub(capacity);
            records.drain(..surplus);
        }
        Self { records, capacity }
    }
}

impl<E> Default for TransitionLog<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TransitionLog<E> {
    /// Create an unbounded, empty log.
    pub fn new() -> Self {
        Self {
            records: VecDeque::new(),
            capacity: None,
        }
    }

    /// Create an empty log keeping at most `capacity` records.
    ///
    /// Storage grows as records arrive, so a large bound costs nothing up
    /// front.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            records: VecDeque::new(),
            capacity: Some(capacity),
        }
    }

    /// Append a record, evicting the oldest one if the log is full.
    pub fn record(&mut self, record: TransitionRecord<E>) {
        if let Some(capacity) = self.capacity {
            if capacity == 0 {
                return;
            }
            while self.records.len() >= capacity {
                self.records.pop_front();
            }
        }
        self.records.push_back(record);
    }

    /// All retained records, oldest first.
    pub fn records(&self) -> impl Iterator<Item = &TransitionRecord<E>> + '_ {
        self.records.iter()
    }

    /// Most recent record.
    pub fn last(&self) -> Option<&TransitionRecord<E>> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Maximum number of retained records, if bounded.
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Get the path of states traversed.
    ///
    /// Returns the source of the oldest retained record followed by the
    /// destination of every record. Re-entrant transitions appear in commit
    /// order, which is not necessarily a contiguous walk: an exit effect that
    /// notifies commits its transition before the outer one.
    pub fn path(&self) -> Vec<StateId> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.front() {
            path.push(first.from);
        }
        path.extend(self.records.iter().map(|record| record.to));
        path
    }

    /// Time elapsed between the oldest and newest retained records.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }
}
