//! Build errors for transition builders.

use thiserror::Error;

/// Errors that can occur when building transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Transition source state not specified. Call .from(state)")]
    MissingFromState,

    #[error("Transition target state not specified. Call .to(state)")]
    MissingToState,

    #[error("Transition event not specified. Call .on(event)")]
    MissingEvent,
}
