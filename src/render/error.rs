//! Rendering errors.

use crate::lifecycle::LifecycleError;
use crate::timeline::ActionKind;

/// Errors raised while turning visible actions into draw calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("{kind} action at {timestamp_ms}ms on page {page} has no {attribute}")]
    MissingRenderAttribute {
        kind: ActionKind,
        page: usize,
        timestamp_ms: u64,
        attribute: &'static str,
    },

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}
