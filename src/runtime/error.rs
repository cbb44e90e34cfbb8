//! Configuration errors reported by a machine.

use crate::core::StateId;
use thiserror::Error;

/// Errors caused by misusing the machine API.
///
/// These are programmer errors. Failing to find a transition for an event is
/// not one of them: that is reported as
/// [`Dispatch::Ignored`](crate::runtime::Dispatch::Ignored).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error("Machine is already running. Call .stop() before starting it again")]
    AlreadyRunning,

    #[error("Initial state not specified. Call .set_initial(state) before .start_initial()")]
    MissingInitialState,

    #[error("Initial state already set to {0}")]
    InitialAlreadySet(StateId),

    #[error("State {0} was not added to this machine. Call .add_state(state) first")]
    UnknownState(StateId),
}
