//! Event dispatch.
//!
//! This module turns the passive pieces from [`crate::core`] into a running
//! machine.
//!
//! # Key Concepts
//!
//! - **Transitions**: edges keyed by event and source state, with an optional
//!   guard and ordered actions
//! - **Machine**: owns the states and the transition table and dispatches one
//!   event at a time, re-entrantly
//! - **Configuration**: options such as transition history, fixed at creation
//!
//! Everything here is single-threaded. Callbacks are `Rc`-shared and the
//! machine relies on interior mutability, so it is neither `Send` nor `Sync`.

mod config;
mod error;
mod machine;
mod table;
mod transition;

pub use config::MachineConfig;
pub use error::MachineError;
pub use machine::{Dispatch, Machine};
pub use transition::Transition;
