//! Replay engine errors.

use crate::lifecycle::{LifecycleError, LifecycleState};

/// Errors returned by [`ReplayEngine`](super::ReplayEngine) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("Cannot {operation} while the engine is {state}")]
    OperationNotAllowed {
        operation: &'static str,
        state: LifecycleState,
    },
}
