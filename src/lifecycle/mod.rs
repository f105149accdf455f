//! Explicit lifecycle state machine for long-lived resources.
//!
//! Every stateful resource in the crate (the replay engine, the render
//! coordinator) owns a [`Lifecycle`] value and exposes it through the
//! [`Stateful`] trait. The transition table is plain data on
//! [`LifecycleState::allowed_next`]; [`Lifecycle::set_state`] is the only
//! way the current state changes.
//!
//! # Usage
//!
//! ```
//! use strokecast::lifecycle::{Lifecycle, LifecycleState, Stateful};
//!
//! let mut lifecycle = Lifecycle::new("example");
//! let _sub = lifecycle.subscribe(|state| println!("now {}", state));
//!
//! lifecycle.set_state(LifecycleState::Initializing).unwrap();
//! lifecycle.set_state(LifecycleState::Initialized).unwrap();
//! assert!(lifecycle.is_initialized());
//! assert!(lifecycle.set_state(LifecycleState::Started).is_err());
//! ```

mod error;
mod listener;
mod state;

pub use error::LifecycleError;
pub use listener::{ListenerId, Listeners, Subscription};
pub use state::LifecycleState;

/// Current and previous state of a resource plus its listeners.
#[derive(Debug)]
pub struct Lifecycle {
    resource: &'static str,
    state: LifecycleState,
    previous: Option<LifecycleState>,
    listeners: Listeners,
}

impl Lifecycle {
    /// Create a lifecycle in `Created`. `resource` names the owner in
    /// errors and log lines.
    pub fn new(resource: &'static str) -> Self {
        Self {
            resource,
            state: LifecycleState::Created,
            previous: None,
            listeners: Listeners::new(),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// State before the last accepted transition, if any.
    pub fn previous_state(&self) -> Option<LifecycleState> {
        self.previous
    }

    /// Move to `next` if the transition table allows it.
    ///
    /// The new state is committed before listeners run, so nothing a
    /// listener does can roll it back.
    pub fn set_state(&mut self, next: LifecycleState) -> Result<(), LifecycleError> {
        if !self.state.can_transition_to(next) {
            return Err(LifecycleError::InvalidTransition {
                resource: self.resource,
                from: self.state,
                to: next,
            });
        }

        let from = self.state;
        self.previous = Some(from);
        self.state = next;
        tracing::debug!(resource = self.resource, %from, to = %next, "lifecycle transition");

        self.listeners.notify(self.resource, next);
        Ok(())
    }

    /// Move into `Error` if the current state allows it.
    ///
    /// Returns false when already in `Error` or in a state with no error
    /// edge (for example `Destroyed`).
    pub fn fail(&mut self) -> bool {
        if self.state == LifecycleState::Error {
            return false;
        }
        self.set_state(LifecycleState::Error).is_ok()
    }

    pub fn subscribe(&self, listener: impl FnMut(LifecycleState) + 'static) -> Subscription {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

/// A resource that owns a [`Lifecycle`].
///
/// The predicates are O(1) reads of the current state.
pub trait Stateful {
    fn lifecycle(&self) -> &Lifecycle;

    fn state(&self) -> LifecycleState {
        self.lifecycle().state()
    }

    fn previous_state(&self) -> Option<LifecycleState> {
        self.lifecycle().previous_state()
    }

    fn is_created(&self) -> bool {
        self.state() == LifecycleState::Created
    }

    fn is_initializing(&self) -> bool {
        self.state() == LifecycleState::Initializing
    }

    fn is_initialized(&self) -> bool {
        self.state() == LifecycleState::Initialized
    }

    fn is_starting(&self) -> bool {
        self.state() == LifecycleState::Starting
    }

    fn is_started(&self) -> bool {
        self.state() == LifecycleState::Started
    }

    fn is_stopping(&self) -> bool {
        self.state() == LifecycleState::Stopping
    }

    fn is_stopped(&self) -> bool {
        self.state() == LifecycleState::Stopped
    }

    fn is_suspending(&self) -> bool {
        self.state() == LifecycleState::Suspending
    }

    fn is_suspended(&self) -> bool {
        self.state() == LifecycleState::Suspended
    }

    fn is_destroying(&self) -> bool {
        self.state() == LifecycleState::Destroying
    }

    fn is_destroyed(&self) -> bool {
        self.state() == LifecycleState::Destroyed
    }

    fn is_error(&self) -> bool {
        self.state() == LifecycleState::Error
    }
}

impl Stateful for Lifecycle {
    fn lifecycle(&self) -> &Lifecycle {
        self
    }
}
