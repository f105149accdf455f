//! Observer registry for lifecycle transitions.
//!
//! Listeners are stored behind `Rc` so notification can iterate a snapshot
//! of the registry. A listener may subscribe or unsubscribe (itself or
//! others) while it is being notified without disturbing the rest of the
//! notification pass.

use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use super::LifecycleState;

type Callback = Rc<RefCell<Box<dyn FnMut(LifecycleState)>>>;

/// Identifier handed out for every subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

struct Entry {
    id: ListenerId,
    callback: Callback,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<Entry>,
}

impl Registry {
    fn contains(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }
}

/// Shared handle to a listener registry.
///
/// Cloning the handle shares the registry, which is how a listener can
/// reach back into it during notification.
#[derive(Clone, Default)]
pub struct Listeners {
    inner: Rc<RefCell<Registry>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. It stays registered until the returned
    /// [`Subscription`] is dropped or [`Listeners::unsubscribe`] is called.
    pub fn subscribe(&self, listener: impl FnMut(LifecycleState) + 'static) -> Subscription {
        let mut registry = self.inner.borrow_mut();
        let id = ListenerId(registry.next_id);
        registry.next_id += 1;
        registry.entries.push(Entry {
            id,
            callback: Rc::new(RefCell::new(Box::new(listener))),
        });

        Subscription {
            id,
            registry: Rc::downgrade(&self.inner),
            active: true,
        }
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.borrow_mut().remove(id)
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver `state` to every listener in subscription order.
    ///
    /// Listeners added during this pass are first notified on the next
    /// transition. Listeners removed during this pass are skipped if they
    /// have not run yet. A panicking listener is logged and the pass
    /// continues with the next one.
    pub(crate) fn notify(&self, resource: &'static str, state: LifecycleState) {
        let snapshot: Vec<(ListenerId, Callback)> = self
            .inner
            .borrow()
            .entries
            .iter()
            .map(|e| (e.id, Rc::clone(&e.callback)))
            .collect();

        for (id, callback) in snapshot {
            if !self.inner.borrow().contains(id) {
                continue;
            }

            let Ok(mut callback) = callback.try_borrow_mut() else {
                tracing::warn!(resource, ?id, %state, "listener re-entered during its own notification, skipped");
                continue;
            };

            let outcome = panic::catch_unwind(AssertUnwindSafe(|| (*callback)(state)));
            if outcome.is_err() {
                tracing::error!(resource, ?id, %state, "lifecycle listener panicked");
            }
        }
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners").field("len", &self.len()).finish()
    }
}

/// Guard returned by [`Listeners::subscribe`].
///
/// Dropping the guard unsubscribes the listener.
#[must_use = "dropping a Subscription immediately unsubscribes the listener"]
pub struct Subscription {
    id: ListenerId,
    registry: Weak<RefCell<Registry>>,
    active: bool,
}

impl Subscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Keep the listener registered for the lifetime of the registry.
    pub fn detach(mut self) -> ListenerId {
        self.active = false;
        self.id
    }

    /// Whether the listener is still registered.
    pub fn is_subscribed(&self) -> bool {
        self.registry
            .upgrade()
            .map(|r| r.borrow().contains(self.id))
            .unwrap_or(false)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if !self.active {
            return;
        }
        if let Some(registry) = self.registry.upgrade() {
            if let Ok(mut registry) = registry.try_borrow_mut() {
                registry.remove(self.id);
            }
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.active)
            .finish()
    }
}
