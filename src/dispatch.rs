//! DispatchTarget — the delegate that performs actual listener bookkeeping
//! and synchronous fan-out.
//!
//! Each [`crate::Eventful`] instance owns exactly one target, created at
//! construction and never shared. There is no host-provided dispatch
//! primitive here, so the target is implemented directly as an
//! ordered-sequence-of-callbacks-per-name structure.
//!
//! Snapshot-on-dispatch semantics mean:
//!   - A listener removed *during* dispatch is still called in that round.
//!   - A listener added *during* dispatch is NOT called until the next round.
//!
//! Panics inside a listener propagate to the caller and interrupt delivery
//! to later listeners — no error isolation at this level.
//!
//! All methods take `&self` (interior mutability via `parking_lot::Mutex`),
//! and the lock is never held while callbacks run, which allows listeners to
//! re-enter `add_listener` / `remove_listener` / `dispatch` without
//! deadlocking — matching JS's naturally reentrant semantics.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::event::Event;

/// A registration ID returned by [`DispatchTarget::add_listener`] that can be
/// passed to [`DispatchTarget::remove_listener`] to remove the listener.
pub type ListenerId = u64;

/// Closure type for event listeners.
pub type ListenerFn = dyn Fn(&Event) + Send + Sync;

/// Per-registration options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListenerOptions {
    /// Auto-deregister the listener after its first invocation.
    pub once: bool,
}

struct Registration {
    id: ListenerId,
    callback: Arc<ListenerFn>,
    once: bool,
}

/// Ordered per-name listener registry with synchronous fan-out.
pub struct DispatchTarget {
    registrations: Mutex<HashMap<String, Vec<Registration>>>,
    next_id: AtomicU64,
}

impl DispatchTarget {
    /// Create a new, empty target.
    pub fn new() -> Self {
        Self {
            registrations: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register `callback` for `name` and return its [`ListenerId`].
    ///
    /// Registrations are appended in call order, which is also dispatch
    /// order. The same callback may be registered any number of times; each
    /// registration is independent.
    pub fn add_listener(
        &self,
        name: &str,
        callback: Arc<ListenerFn>,
        options: ListenerOptions,
    ) -> ListenerId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.registrations
            .lock()
            .entry(name.to_string())
            .or_default()
            .push(Registration {
                id,
                callback,
                once: options.once,
            });
        id
    }

    /// Remove the registration identified by `id` under `name`.
    ///
    /// Does nothing if the name or id is not present (safe to call multiple
    /// times).
    pub fn remove_listener(&self, name: &str, id: ListenerId) {
        let mut regs = self.registrations.lock();
        if let Some(entries) = regs.get_mut(name) {
            entries.retain(|r| r.id != id);
            if entries.is_empty() {
                regs.remove(name);
            }
        }
    }

    /// Dispatch `event` synchronously to all listeners registered for its
    /// name, in registration order.
    ///
    /// A snapshot of the registrations is taken before iteration so that
    /// additions or removals during a callback do not affect the current
    /// round. `once` registrations are dropped from the table while the
    /// snapshot is taken — before their callback runs — so a reentrant
    /// dispatch from inside a listener cannot fire them twice.
    pub fn dispatch(&self, event: &Event) {
        // Snapshot Arc references under the lock (cheap: just ref-count
        // bumps), shedding `once` entries in the same pass.
        let snapshot: Vec<Arc<ListenerFn>> = {
            let mut regs = self.registrations.lock();
            match regs.get_mut(event.name()) {
                Some(entries) => {
                    let callbacks = entries.iter().map(|r| Arc::clone(&r.callback)).collect();
                    entries.retain(|r| !r.once);
                    if entries.is_empty() {
                        regs.remove(event.name());
                    }
                    callbacks
                }
                // Zero subscribers is tolerated — dispatch is a no-op.
                None => Vec::new(),
            }
        };
        // Lock is released — callbacks can safely re-enter this target.
        for callback in snapshot {
            callback(event);
        }
    }

    /// Number of registrations currently held for `name`.
    pub fn listener_count(&self, name: &str) -> usize {
        self.registrations
            .lock()
            .get(name)
            .map_or(0, |entries| entries.len())
    }

    /// Drop every registration for every name.
    pub fn clear(&self) {
        self.registrations.lock().clear();
    }
}

impl Default for DispatchTarget {
    fn default() -> Self {
        Self::new()
    }
}
