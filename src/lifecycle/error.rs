//! Lifecycle transition errors.

use super::LifecycleState;

/// Errors raised by a [`Lifecycle`](super::Lifecycle).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("{resource}: invalid transition from {from} to {to}")]
    InvalidTransition {
        resource: &'static str,
        from: LifecycleState,
        to: LifecycleState,
    },
}

impl LifecycleError {
    /// The state the resource was in when the transition was refused.
    pub fn from_state(&self) -> LifecycleState {
        match self {
            Self::InvalidTransition { from, .. } => *from,
        }
    }

    /// The state that was requested.
    pub fn requested_state(&self) -> LifecycleState {
        match self {
            Self::InvalidTransition { to, .. } => *to,
        }
    }
}
