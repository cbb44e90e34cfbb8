//! Switchyard: a lightweight, re-entrant finite state machine runtime
//!
//! Switchyard is a small building block for protocol handlers, UI flows and
//! device controllers. The host declares states, connects them with
//! transitions keyed by events, and drives the machine one event at a time.
//!
//! # Core Concepts
//!
//! - **State**: an execution point with optional entry and exit effects,
//!   identified by the [`StateId`] handle the machine hands out
//! - **Transition**: an edge between two states, keyed by an event, with an
//!   optional guard and ordered actions
//! - **Machine**: the transition table plus a single current state; events
//!   are dispatched synchronously and may be raised from inside callbacks
//!
//! # Example
//!
//! ```rust
//! use switchyard::{Dispatch, Machine, State, Transition};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! #[derive(Clone, PartialEq, Eq, Hash, Debug)]
//! enum Coin {
//!     Insert,
//!     Push,
//! }
//!
//! let coins = Rc::new(Cell::new(0));
//! let counter = Rc::clone(&coins);
//!
//! let machine = Machine::new();
//! let locked = machine.add_state(State::named("locked"));
//! let open = machine.add_state(State::named("open"));
//!
//! machine
//!     .register(
//!         Transition::new(locked, open, Coin::Insert)
//!             .add_action(move || counter.set(counter.get() + 1)),
//!     )
//!     .unwrap();
//! machine.register(Transition::new(open, locked, Coin::Push)).unwrap();
//!
//! machine.start(locked).unwrap();
//! assert_eq!(machine.notify(Coin::Push), Dispatch::Ignored);
//! assert_eq!(
//!     machine.notify(Coin::Insert),
//!     Dispatch::Transitioned { from: locked, to: open }
//! );
//! assert_eq!(coins.get(), 1);
//! ```

pub mod builder;
pub mod core;
pub mod runtime;

// Re-export commonly used types
pub use crate::builder::{BuildError, TransitionBuilder};
pub use crate::core::{Action, Event, Guard, State, StateId, TransitionLog, TransitionRecord};
pub use crate::runtime::{Dispatch, Machine, MachineConfig, MachineError, Transition};
