//! Lifecycle states and the fixed transition table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operating state of a long-lived resource.
///
/// The `-ing` variants are transitional: a resource passes through them
/// on its way to the matching settled state, or falls into `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Created,
    Initializing,
    Initialized,
    Starting,
    Started,
    Stopping,
    Stopped,
    Suspending,
    Suspended,
    Destroying,
    Destroyed,
    Error,
}

impl LifecycleState {
    /// Every state, in declaration order.
    pub const ALL: [LifecycleState; 12] = [
        LifecycleState::Created,
        LifecycleState::Initializing,
        LifecycleState::Initialized,
        LifecycleState::Starting,
        LifecycleState::Started,
        LifecycleState::Stopping,
        LifecycleState::Stopped,
        LifecycleState::Suspending,
        LifecycleState::Suspended,
        LifecycleState::Destroying,
        LifecycleState::Destroyed,
        LifecycleState::Error,
    ];

    /// States reachable from `self` in a single transition.
    pub fn allowed_next(self) -> &'static [LifecycleState] {
        use LifecycleState::*;
        match self {
            Created => &[Initializing, Destroying],
            Initializing => &[Initialized, Error],
            Initialized => &[Starting, Destroying],
            Starting => &[Started, Error],
            Started => &[Suspending, Stopping, Destroying, Error],
            Stopping => &[Stopped, Error],
            Stopped => &[Starting, Destroying],
            Suspending => &[Suspended, Error],
            Suspended => &[Starting, Stopping, Destroying],
            Destroying => &[Destroyed, Error],
            Destroyed => &[Initializing],
            Error => &[Starting, Stopping, Destroying],
        }
    }

    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: LifecycleState) -> bool {
        self.allowed_next().contains(&next)
    }

    /// Whether `Error` is directly reachable from this state.
    pub fn can_fail(self) -> bool {
        self.can_transition_to(LifecycleState::Error)
    }

    /// Transitional states are only observed while an operation is running.
    pub fn is_transitional(self) -> bool {
        matches!(
            self,
            LifecycleState::Initializing
                | LifecycleState::Starting
                | LifecycleState::Stopping
                | LifecycleState::Suspending
                | LifecycleState::Destroying
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            LifecycleState::Created => "created",
            LifecycleState::Initializing => "initializing",
            LifecycleState::Initialized => "initialized",
            LifecycleState::Starting => "starting",
            LifecycleState::Started => "started",
            LifecycleState::Stopping => "stopping",
            LifecycleState::Stopped => "stopped",
            LifecycleState::Suspending => "suspending",
            LifecycleState::Suspended => "suspended",
            LifecycleState::Destroying => "destroying",
            LifecycleState::Destroyed => "destroyed",
            LifecycleState::Error => "error",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
