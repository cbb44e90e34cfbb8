//! Core building blocks of a state machine.
//!
//! This module contains the passive pieces the runtime is assembled from:
//! - States and their arena handles
//! - Actions and guards wrapping host callbacks
//! - The bound on event types
//! - Transition history records
//!
//! Nothing in here dispatches events; that lives in [`crate::runtime`].

mod action;
mod event;
mod guard;
mod history;
mod state;

pub use action::Action;
pub use event::Event;
pub use guard::Guard;
pub use history::{TransitionLog, TransitionRecord};
pub use state::{State, StateId};
