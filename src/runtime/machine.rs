//! State machine that dispatches events to guarded transitions.

use crate::core::{Event, State, StateId, TransitionLog, TransitionRecord};
use crate::runtime::config::MachineConfig;
use crate::runtime::error::MachineError;
use crate::runtime::table::TransitionTable;
use crate::runtime::transition::Transition;
use chrono::Utc;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace};

/// Outcome of a single [`Machine::notify`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// A transition committed, moving the machine from `from` to `to`
    Transitioned { from: StateId, to: StateId },

    /// No registered transition accepted the event; nothing happened
    Ignored,

    /// The machine is stopped; the event was dropped
    NotRunning,
}

impl Dispatch {
    pub fn is_transition(&self) -> bool {
        matches!(self, Self::Transitioned { .. })
    }
}

/// Finite state machine driven one event at a time.
///
/// The machine owns an arena of [`State`]s, a table of [`Transition`]s keyed
/// by (event, source state) and a single current-state pointer. All methods
/// take `&self`, so callbacks can hold a `Weak<Machine<E>>` and feed events
/// back into the machine that is running them.
///
/// # Dispatch
///
/// [`notify`](Self::notify) looks up the candidates registered for the event
/// and the current state and evaluates their guards in registration order.
/// The first one that passes commits:
///
/// 1. the current state's exit effect runs,
/// 2. the transition's actions run in declaration order,
/// 3. the current-state pointer moves to the destination,
/// 4. the destination's entry effect runs.
///
/// If no guard passes, nothing happens.
///
/// # Re-entrancy
///
/// Any callback may call `notify` again. Nested calls are processed to
/// completion on the call stack before the outer call resumes; they are not
/// queued. The outer call has already chosen its transition and destination,
/// so it carries on with its remaining steps without looking at the table
/// again. The state it leaves is whichever one is current when it commits:
/// if a guard's nested call moved the machine, the outer call leaves that
/// state, and reports and records it as the source.
///
/// The pointer moves after the actions and before the entry effect. A nested
/// call from an exit effect or an action therefore still observes the source
/// state, while one from an entry effect observes the destination.
///
/// Host callbacks report failure by panicking. The machine never catches the
/// panic and never rolls back, so a panic mid-transition leaves whatever part
/// of the commit already happened in place.
///
/// # Example
///
/// ```rust
/// use switchyard::core::State;
/// use switchyard::runtime::{Dispatch, Machine, Transition};
/// use std::rc::Rc;
///
/// let machine = Rc::new(Machine::new());
/// let handle = Rc::downgrade(&machine);
///
/// // Entering `init` immediately raises 'q'
/// let init = machine.add_state(State::named("init").on_enter(move || {
///     if let Some(machine) = handle.upgrade() {
///         machine.notify('q');
///     }
/// }));
/// let done = machine.add_state(State::named("done"));
///
/// machine.register(Transition::new(init, done, 'q')).unwrap();
/// machine.start(init).unwrap();
///
/// assert_eq!(machine.current_state(), Some(done));
/// assert_eq!(machine.notify('q'), Dispatch::Ignored);
/// ```
///
/// Zero-sized event types are rejected at compile time. A type with a single
/// value can't tell one event from another, so see [`Event`] for how to
/// model a one-event machine:
///
/// ```rust,compile_fail
/// use switchyard::runtime::Machine;
///
/// let machine: Machine<()> = Machine::new();
/// ```
pub struct Machine<E: Event> {
    config: MachineConfig,
    states: RefCell<Vec<Rc<State>>>,
    table: RefCell<TransitionTable<E>>,
    initial: Cell<Option<StateId>>,
    current: Cell<Option<StateId>>,
    running: Cell<bool>,
    depth: Cell<usize>,
    history: RefCell<TransitionLog<E>>,
}

impl<E: Event> Machine<E> {
    const EVENT_CARRIES_VALUE: () = assert!(
        std::mem::size_of::<E>() != 0,
        "machine event type must carry a value; `()` and other zero-sized types are rejected"
    );

    /// Create an empty, stopped machine with the default configuration.
    pub fn new() -> Self {
        Self::with_config(MachineConfig::default())
    }

    /// Create an empty, stopped machine.
    pub fn with_config(config: MachineConfig) -> Self {
        let () = Self::EVENT_CARRIES_VALUE;

        let history = match config.capacity() {
            Some(capacity) if config.records_history() => TransitionLog::bounded(capacity),
            _ => TransitionLog::new(),
        };

        Self {
            config,
            states: RefCell::new(Vec::new()),
            table: RefCell::new(TransitionTable::new()),
            initial: Cell::new(None),
            current: Cell::new(None),
            running: Cell::new(false),
            depth: Cell::new(0),
            history: RefCell::new(history),
        }
    }

    /// Move a state into the arena and return its handle.
    pub fn add_state(&self, state: State) -> StateId {
        let mut states = self.states.borrow_mut();
        let id = StateId::new(states.len());
        trace!(state = %id, name = ?state.name(), "state added");
        states.push(Rc::new(state));
        id
    }

    /// Register a copy of `transition` under its (event, source) key.
    ///
    /// Transitions sharing a key are kept in registration order. Nothing is
    /// de-duplicated and reachability is not checked; the only requirement is
    /// that both endpoints were added to this machine.
    pub fn register(&self, transition: Transition<E>) -> Result<(), MachineError> {
        self.ensure_known(transition.from())?;
        self.ensure_known(transition.to())?;

        trace!(
            from = %transition.from(),
            to = %transition.to(),
            event = ?transition.event(),
            guarded = transition.has_guard(),
            actions = transition.action_count(),
            "transition registered"
        );
        self.table.borrow_mut().insert(transition);
        Ok(())
    }

    /// Remember the state [`start_initial`](Self::start_initial) begins in.
    ///
    /// The initial state can be assigned only once.
    pub fn set_initial(&self, state: StateId) -> Result<(), MachineError> {
        if let Some(existing) = self.initial.get() {
            return Err(MachineError::InitialAlreadySet(existing));
        }
        self.ensure_known(state)?;
        self.initial.set(Some(state));
        Ok(())
    }

    /// Start in the state assigned with [`set_initial`](Self::set_initial).
    pub fn start_initial(&self) -> Result<(), MachineError> {
        let initial = self
            .initial
            .get()
            .ok_or(MachineError::MissingInitialState)?;
        self.start(initial)
    }

    /// Make `initial` the current state, mark the machine running, then run
    /// the state's entry effect.
    ///
    /// The machine is already running when the entry effect executes, so an
    /// entry effect may raise events.
    pub fn start(&self, initial: StateId) -> Result<(), MachineError> {
        if self.running.get() {
            return Err(MachineError::AlreadyRunning);
        }
        let state = self
            .state(initial)
            .ok_or(MachineError::UnknownState(initial))?;

        self.current.set(Some(initial));
        self.running.set(true);
        debug!(state = %initial, name = ?state.name(), "machine started");

        state.enter();
        Ok(())
    }

    /// Run the current state's exit effect and mark the machine stopped.
    ///
    /// The current state is kept so it can still be inspected.
    pub fn stop(&self) {
        let current = self.current.get();
        if let Some(state) = current.and_then(|id| self.state(id)) {
            state.leave();
        }
        self.running.set(false);
        debug!(state = ?current, "machine stopped");
    }

    /// Feed one event to the machine.
    ///
    /// See the type-level documentation for the dispatch order and the
    /// re-entrancy rules. A stopped machine drops the event.
    pub fn notify(&self, event: E) -> Dispatch {
        if !self.running.get() {
            trace!(event = ?event, "machine not running, event dropped");
            return Dispatch::NotRunning;
        }
        let Some(from) = self.current.get() else {
            return Dispatch::Ignored;
        };

        let depth = DepthGuard::enter(&self.depth);

        // Snapshot so the table is not borrowed while guards run.
        let candidates = self.table.borrow().candidates(&event, from);
        let selected = candidates.into_iter().find(|candidate| {
            let passes = candidate.guard_passes();
            if !passes {
                trace!(
                    from = %from,
                    to = %candidate.to(),
                    event = ?event,
                    "guard rejected transition"
                );
            }
            passes
        });
        let Some(selected) = selected else {
            trace!(state = %from, event = ?event, depth = depth.level(), "event ignored");
            return Dispatch::Ignored;
        };

        // A guard may have moved the machine through a nested call.
        let from = self.current.get().unwrap_or(from);
        let to = selected.to();
        let level = depth.level();
        debug!(from = %from, to = %to, event = ?event, depth = level, "transition selected");

        if let Some(state) = self.state(from) {
            state.leave();
        }
        selected.invoke_actions();
        self.current.set(Some(to));
        self.record(from, to, event, level);
        if let Some(state) = self.state(to) {
            state.enter();
        }

        Dispatch::Transitioned { from, to }
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn is_stopped(&self) -> bool {
        !self.is_running()
    }

    /// Current state; `None` until the machine has been started once.
    pub fn current_state(&self) -> Option<StateId> {
        self.current.get()
    }

    pub fn initial_state(&self) -> Option<StateId> {
        self.initial.get()
    }

    /// Number of `notify` calls currently on the stack.
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    pub fn state_count(&self) -> usize {
        self.states.borrow().len()
    }

    pub fn transition_count(&self) -> usize {
        self.table.borrow().len()
    }

    /// Diagnostic name of a state, if it has one.
    pub fn state_name(&self, id: StateId) -> Option<String> {
        self.state(id)
            .and_then(|state| state.name().map(str::to_owned))
    }

    /// Copy of the transition log. Empty unless history is enabled.
    pub fn history(&self) -> TransitionLog<E> {
        self.history.borrow().clone()
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    fn state(&self, id: StateId) -> Option<Rc<State>> {
        self.states.borrow().get(id.index()).cloned()
    }

    fn ensure_known(&self, id: StateId) -> Result<(), MachineError> {
        if id.index() < self.state_count() {
            Ok(())
        } else {
            Err(MachineError::UnknownState(id))
        }
    }

    fn record(&self, from: StateId, to: StateId, event: E, depth: usize) {
        if !self.config.records_history() {
            return;
        }
        self.history.borrow_mut().record(TransitionRecord {
            from,
            to,
            event,
            depth,
            timestamp: Utc::now(),
        });
    }
}

impl<E: Event> Default for Machine<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Event> fmt::Debug for Machine<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("running", &self.running.get())
            .field("current", &self.current.get())
            .field("states", &self.state_count())
            .field("transitions", &self.transition_count())
            .field("depth", &self.depth.get())
            .finish_non_exhaustive()
    }
}

/// Keeps the dispatch depth balanced, including when a callback panics.
struct DepthGuard<'a> {
    depth: &'a Cell<usize>,
}

impl<'a> DepthGuard<'a> {
    fn enter(depth: &'a Cell<usize>) -> Self {
        depth.set(depth.get() + 1);
        Self { depth }
    }

    fn level(&self) -> usize {
        self.depth.get()
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get() - 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    type Log = Rc<RefCell<Vec<String>>>;

    fn log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn push(log: &Log, entry: impl Into<String>) -> impl Fn() + 'static {
        let log = Rc::clone(log);
        let entry = entry.into();
        move || log.borrow_mut().push(entry.clone())
    }

    fn traced(log: &Log, name: &str) -> State {
        State::named(name)
            .on_enter(push(log, format!("{name}.enter")))
            .on_leave(push(log, format!("{name}.leave")))
    }

    #[test]
    fn single_state_runs_enter_on_start_and_leave_on_stop() {
        let log = log();
        let machine: Machine<char> = Machine::new();
        let only = machine.add_state(traced(&log, "only"));

        machine.start(only).unwrap();
        assert!(machine.is_running());
        machine.stop();

        assert!(machine.is_stopped());
        assert_eq!(*log.borrow(), vec!["only.enter", "only.leave"]);
        assert_eq!(machine.current_state(), Some(only));
    }

    #[test]
    fn committed_transition_runs_leave_actions_enter_in_order() {
        let log = log();
        let machine = Machine::new();
        let a = machine.add_state(traced(&log, "a"));
        let b = machine.add_state(traced(&log, "b"));
        machine
            .register(
                Transition::new(a, b, 'q')
                    .guard_is(|| true)
                    .add_action(push(&log, "action1"))
                    .add_action(push(&log, "action2")),
            )
            .unwrap();

        machine.start(a).unwrap();
        let outcome = machine.notify('q');

        assert_eq!(outcome, Dispatch::Transitioned { from: a, to: b });
        assert!(outcome.is_transition());
        assert_eq!(machine.current_state(), Some(b));
        assert_eq!(
            *log.borrow(),
            vec!["a.enter", "a.leave", "action1", "action2", "b.enter"]
        );
    }

    #[test]
    fn rejected_guard_fires_nothing() {
        let log = log();
        let machine = Machine::new();
        let a = machine.add_state(traced(&log, "a"));
        let b = machine.add_state(traced(&log, "b"));
        machine
            .register(
                Transition::new(a, b, 'q')
                    .guard_is(|| false)
                    .add_action(push(&log, "action")),
            )
            .unwrap();

        machine.start(a).unwrap();
        log.borrow_mut().clear();

        let outcome = machine.notify('q');
        assert_eq!(outcome, Dispatch::Ignored);
        assert!(!outcome.is_transition());
        assert!(log.borrow().is_empty());
        assert_eq!(machine.current_state(), Some(a));
    }

    #[test]
    fn first_passing_guard_wins_and_later_guards_are_skipped() {
        let log = log();
        let machine = Machine::new();
        let a = machine.add_state(State::new());
        let rejected = machine.add_state(State::new());
        let accepted = machine.add_state(State::new());
        let shadowed = machine.add_state(State::new());

        let (g1, g2, g3) = (Rc::clone(&log), Rc::clone(&log), Rc::clone(&log));
        machine
            .register(Transition::new(a, rejected, 'q').guard_is(move || {
                g1.borrow_mut().push("g1".into());
                false
            }))
            .unwrap();
        machine
            .register(Transition::new(a, accepted, 'q').guard_is(move || {
                g2.borrow_mut().push("g2".into());
                true
            }))
            .unwrap();
        machine
            .register(Transition::new(a, shadowed, 'q').guard_is(move || {
                g3.borrow_mut().push("g3".into());
                true
            }))
            .unwrap();

        machine.start(a).unwrap();
        machine.notify('q');

        assert_eq!(machine.current_state(), Some(accepted));
        assert_eq!(*log.borrow(), vec!["g1", "g2"]);
    }

    #[test]
    fn unknown_event_is_ignored() {
        let machine = Machine::new();
        let a = machine.add_state(State::new());
        let b = machine.add_state(State::new());
        machine.register(Transition::new(a, b, 'q')).unwrap();

        machine.start(a).unwrap();

        assert_eq!(machine.notify('x'), Dispatch::Ignored);
        assert_eq!(machine.current_state(), Some(a));
    }

    #[test]
    fn notify_before_start_or_after_stop_is_dropped() {
        let machine = Machine::new();
        let a = machine.add_state(State::new());
        let b = machine.add_state(State::new());
        machine.register(Transition::new(a, b, 'q')).unwrap();

        assert_eq!(machine.notify('q'), Dispatch::NotRunning);
        assert_eq!(machine.current_state(), None);

        machine.start(a).unwrap();
        machine.stop();

        assert_eq!(machine.notify('q'), Dispatch::NotRunning);
        assert_eq!(machine.current_state(), Some(a));
    }

    #[test]
    fn entry_effect_can_notify_during_start() {
        let log = log();
        let machine = Rc::new(Machine::new());
        let handle = Rc::downgrade(&machine);
        let leave = push(&log, "a.leave");

        let a = machine.add_state(
            State::named("a")
                .on_enter(move || {
                    if let Some(machine) = handle.upgrade() {
                        machine.notify('q');
                    }
                })
                .on_leave(leave),
        );
        let b = machine.add_state(traced(&log, "b"));
        machine.register(Transition::new(a, b, 'q')).unwrap();

        machine.start(a).unwrap();

        assert_eq!(machine.current_state(), Some(b));
        assert_eq!(*log.borrow(), vec!["a.leave", "b.enter"]);
        assert_eq!(machine.depth(), 0);
    }

    #[test]
    fn nested_notify_completes_before_outer_call_returns() {
        let log = log();
        let machine = Rc::new(Machine::with_config(
            MachineConfig::default().record_history(true),
        ));
        let handle = Rc::downgrade(&machine);
        let depth_reader = Rc::downgrade(&machine);
        let depths = Rc::new(RefCell::new(Vec::new()));
        let seen = Rc::clone(&depths);

        let a = machine.add_state(traced(&log, "a"));
        let b = machine.add_state(State::named("b").on_enter(move || {
            if let Some(machine) = handle.upgrade() {
                machine.notify('y');
            }
        }));
        let c = machine.add_state(State::named("c").on_enter(move || {
            if let Some(machine) = depth_reader.upgrade() {
                seen.borrow_mut().push(machine.depth());
            }
        }));
        machine.register(Transition::new(a, b, 'x')).unwrap();
        machine.register(Transition::new(b, c, 'y')).unwrap();

        machine.start(a).unwrap();
        let outcome = machine.notify('x');

        assert_eq!(outcome, Dispatch::Transitioned { from: a, to: b });
        assert_eq!(machine.current_state(), Some(c));
        assert_eq!(*depths.borrow(), vec![2]);

        let history = machine.history();
        let committed: Vec<(StateId, StateId, usize)> =
            history.records().map(|r| (r.from, r.to, r.depth)).collect();
        assert_eq!(committed, vec![(a, b, 1), (b, c, 2)]);
        assert_eq!(history.path(), vec![a, b, c]);
    }

    #[test]
    fn guard_notify_moves_the_state_the_outer_commit_leaves() {
        let log = log();
        let machine = Rc::new(Machine::with_config(
            MachineConfig::default().record_history(true),
        ));
        let handle = Rc::downgrade(&machine);

        let a = machine.add_state(traced(&log, "a"));
        let b = machine.add_state(traced(&log, "b"));
        let c = machine.add_state(traced(&log, "c"));
        machine
            .register(Transition::new(a, b, 'q').guard_is(move || {
                if let Some(machine) = handle.upgrade() {
                    machine.notify('r');
                }
                true
            }))
            .unwrap();
        machine.register(Transition::new(a, c, 'r')).unwrap();

        machine.start(a).unwrap();
        log.borrow_mut().clear();
        let outcome = machine.notify('q');

        assert_eq!(outcome, Dispatch::Transitioned { from: c, to: b });
        assert_eq!(*log.borrow(), vec!["a.leave", "c.enter", "c.leave", "b.enter"]);
        assert_eq!(machine.current_state(), Some(b));

        let history = machine.history();
        let committed: Vec<(StateId, StateId, usize)> =
            history.records().map(|r| (r.from, r.to, r.depth)).collect();
        assert_eq!(committed, vec![(a, c, 2), (c, b, 1)]);
        assert_eq!(machine.depth(), 0);
    }

    #[test]
    fn exit_effect_notify_commits_before_outer_actions() {
        let log = log();
        let machine = Rc::new(Machine::new());
        let handle = Rc::downgrade(&machine);
        let raised = Rc::new(Cell::new(false));

        let leave_log = Rc::clone(&log);
        let a = machine.add_state(State::named("a").on_leave(move || {
            leave_log.borrow_mut().push("a.leave".to_string());
            if !raised.replace(true) {
                if let Some(machine) = handle.upgrade() {
                    machine.notify('r');
                }
            }
        }));
        let b = machine.add_state(traced(&log, "b"));
        let c = machine.add_state(traced(&log, "c"));
        machine
            .register(Transition::new(a, b, 'q').add_action(push(&log, "a->b")))
            .unwrap();
        machine
            .register(Transition::new(a, c, 'r').add_action(push(&log, "a->c")))
            .unwrap();

        machine.start(a).unwrap();
        let outcome = machine.notify('q');

        // The nested call still sees `a` as current, so it leaves `a` again.
        assert_eq!(outcome, Dispatch::Transitioned { from: a, to: b });
        assert_eq!(
            *log.borrow(),
            vec!["a.leave", "a.leave", "a->c", "c.enter", "a->b", "b.enter"]
        );
        assert_eq!(machine.current_state(), Some(b));
        assert_eq!(machine.depth(), 0);
    }

    #[test]
    fn action_notify_runs_from_the_source_state() {
        let log = log();
        let machine = Rc::new(Machine::with_config(
            MachineConfig::default().record_history(true),
        ));
        let handle = Rc::downgrade(&machine);

        let a = machine.add_state(traced(&log, "a"));
        let b = machine.add_state(traced(&log, "b"));
        let c = machine.add_state(traced(&log, "c"));
        let nested = push(&log, "a->b");
        machine
            .register(Transition::new(a, b, 'q').add_action(move || {
                nested();
                if let Some(machine) = handle.upgrade() {
                    machine.notify('r');
                }
            }))
            .unwrap();
        machine
            .register(Transition::new(a, c, 'r').add_action(push(&log, "a->c")))
            .unwrap();

        machine.start(a).unwrap();
        log.borrow_mut().clear();
        let outcome = machine.notify('q');

        assert_eq!(outcome, Dispatch::Transitioned { from: a, to: b });
        assert_eq!(
            *log.borrow(),
            vec!["a.leave", "a->b", "a.leave", "a->c", "c.enter", "b.enter"]
        );
        // The outer commit overwrites the pointer the nested call set.
        assert_eq!(machine.current_state(), Some(b));

        let committed: Vec<(StateId, StateId)> =
            machine.history().records().map(|r| (r.from, r.to)).collect();
        assert_eq!(committed, vec![(a, c), (a, b)]);
    }

    #[test]
    fn huge_history_capacity_does_not_allocate_up_front() {
        let json = r#"{"history_capacity":18446744073709551615}"#;

        let disabled: MachineConfig = serde_json::from_str(json).unwrap();
        let machine: Machine<char> = Machine::with_config(disabled);
        assert_eq!(machine.history().capacity(), None);

        let enabled = serde_json::from_str::<MachineConfig>(json)
            .unwrap()
            .record_history(true);
        let machine = Machine::with_config(enabled);
        let a = machine.add_state(State::new());
        let b = machine.add_state(State::new());
        machine.register(Transition::new(a, b, 'q')).unwrap();
        machine.start(a).unwrap();
        machine.notify('q');

        let history = machine.history();
        assert_eq!(history.capacity(), Some(usize::MAX));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn stop_inside_entry_effect_halts_machine() {
        let machine = Rc::new(Machine::new());
        let handle = Rc::downgrade(&machine);
        let a = machine.add_state(State::new());
        let broken = machine.add_state(State::named("broken").on_enter(move || {
            if let Some(machine) = handle.upgrade() {
                machine.stop();
            }
        }));
        machine.register(Transition::new(a, broken, 1u8)).unwrap();

        machine.start(a).unwrap();
        machine.notify(1);

        assert!(machine.is_stopped());
        assert_eq!(machine.current_state(), Some(broken));
    }

    #[test]
    fn start_twice_is_rejected() {
        let machine: Machine<char> = Machine::new();
        let a = machine.add_state(State::new());

        machine.start(a).unwrap();
        assert_eq!(machine.start(a), Err(MachineError::AlreadyRunning));

        machine.stop();
        assert!(machine.start(a).is_ok());
    }

    #[test]
    fn start_with_foreign_state_is_rejected() {
        let machine: Machine<char> = Machine::new();
        let other: Machine<char> = Machine::new();
        other.add_state(State::new());
        let foreign = other.add_state(State::new());

        assert_eq!(
            machine.start(foreign),
            Err(MachineError::UnknownState(foreign))
        );
        assert!(machine.is_stopped());
    }

    #[test]
    fn register_rejects_unknown_endpoints() {
        let machine = Machine::new();
        let a = machine.add_state(State::new());
        let ghost = StateId::new(5);

        assert_eq!(
            machine.register(Transition::new(a, ghost, 'q')),
            Err(MachineError::UnknownState(ghost))
        );
        assert_eq!(
            machine.register(Transition::new(ghost, a, 'q')),
            Err(MachineError::UnknownState(ghost))
        );
        assert_eq!(machine.transition_count(), 0);
    }

    #[test]
    fn start_initial_requires_initial_state() {
        let machine: Machine<char> = Machine::new();
        assert_eq!(
            machine.start_initial(),
            Err(MachineError::MissingInitialState)
        );

        let a = machine.add_state(State::new());
        let b = machine.add_state(State::new());
        machine.set_initial(a).unwrap();
        assert_eq!(
            machine.set_initial(b),
            Err(MachineError::InitialAlreadySet(a))
        );

        machine.start_initial().unwrap();
        assert_eq!(machine.current_state(), Some(a));
        assert_eq!(machine.initial_state(), Some(a));
    }

    #[test]
    fn panicking_action_leaves_partial_commit() {
        let log = log();
        let machine = Machine::new();
        let a = machine.add_state(traced(&log, "a"));
        let b = machine.add_state(traced(&log, "b"));
        machine
            .register(
                Transition::new(a, b, 'q')
                    .add_action(push(&log, "before"))
                    .add_action(|| panic!("action failed"))
                    .add_action(push(&log, "after")),
            )
            .unwrap();
        machine.start(a).unwrap();

        let result = catch_unwind(AssertUnwindSafe(|| machine.notify('q')));

        assert!(result.is_err());
        assert_eq!(*log.borrow(), vec!["a.enter", "a.leave", "before"]);
        assert_eq!(machine.current_state(), Some(a));
        assert_eq!(machine.depth(), 0);
        assert!(machine.is_running());
    }

    #[test]
    fn panicking_entry_effect_keeps_new_state() {
        let machine = Machine::new();
        let a = machine.add_state(State::new());
        let b = machine.add_state(State::new().on_enter(|| panic!("enter failed")));
        machine.register(Transition::new(a, b, 'q')).unwrap();
        machine.start(a).unwrap();

        let result = catch_unwind(AssertUnwindSafe(|| machine.notify('q')));

        assert!(result.is_err());
        assert_eq!(machine.current_state(), Some(b));
        assert_eq!(machine.depth(), 0);
    }

    #[test]
    fn history_is_empty_unless_enabled() {
        let machine = Machine::new();
        let a = machine.add_state(State::new());
        let b = machine.add_state(State::new());
        machine.register(Transition::new(a, b, 'q')).unwrap();
        machine.start(a).unwrap();
        machine.notify('q');

        assert!(machine.history().is_empty());
    }

    #[test]
    fn bounded_history_keeps_latest_records() {
        let machine = Machine::with_config(
            MachineConfig::default()
                .record_history(true)
                .history_capacity(2),
        );
        let a = machine.add_state(State::new());
        let b = machine.add_state(State::new());
        machine.register(Transition::new(a, b, 'x')).unwrap();
        machine.register(Transition::new(b, a, 'y')).unwrap();
        machine.start(a).unwrap();

        for event in ['x', 'y', 'x'] {
            machine.notify(event);
        }

        let events: Vec<char> = machine.history().records().map(|r| r.event).collect();
        assert_eq!(events, vec!['y', 'x']);
    }

    #[test]
    fn registration_from_a_callback_does_not_disturb_dispatch() {
        let machine = Rc::new(Machine::new());
        let handle = Rc::downgrade(&machine);
        let a = machine.add_state(State::new());
        let b = machine.add_state(State::new());
        machine
            .register(Transition::new(a, b, 'q').add_action(move || {
                if let Some(machine) = handle.upgrade() {
                    machine
                        .register(Transition::new(StateId::new(1), StateId::new(0), 'r'))
                        .unwrap();
                }
            }))
            .unwrap();

        machine.start(a).unwrap();
        machine.notify('q');
        assert_eq!(machine.current_state(), Some(b));

        machine.notify('r');
        assert_eq!(machine.current_state(), Some(a));
        assert_eq!(machine.transition_count(), 2);
    }

    #[test]
    fn state_names_and_counts_are_inspectable() {
        let machine: Machine<u32> = Machine::new();
        let idle = machine.add_state(State::named("idle"));
        let anonymous = machine.add_state(State::new());

        assert_eq!(machine.state_count(), 2);
        assert_eq!(machine.state_name(idle).as_deref(), Some("idle"));
        assert_eq!(machine.state_name(anonymous), None);
        assert_eq!(machine.state_name(StateId::new(9)), None);
        assert!(format!("{machine:?}").contains("running: false"));
    }
}
