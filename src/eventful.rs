//! Eventful — listener registration, removal, and dispatch.
//!
//! # Bookkeeping model
//!
//! Two tables, kept length-consistent per event name:
//!   - the listener table: per name, the ordered entries registered via
//!     [`Eventful::on`] / [`Eventful::once`];
//!   - the once-index table: per name, the positions within that name's
//!     entries that were registered one-shot.
//!
//! Actual fan-out is delegated to an owned [`DispatchTarget`]; the tables
//! exist so `off` can deregister everything for a name and so one-shot
//! entries can be pruned after a dispatch even when the delegate's native
//! `once` handling differs.
//!
//! # Threading model
//!
//! All methods take `&self`. State sits behind a `parking_lot::Mutex` that is
//! never held while the delegate fans out, so listeners may re-enter
//! `on` / `once` / `off` / `fire_event` on the same instance.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::dispatch::{DispatchTarget, ListenerFn, ListenerId, ListenerOptions};
use crate::error::{EventfulError, Result};
use crate::event::Event;

// ============================================================================
// Internal state
// ============================================================================

struct EventfulState {
    /// Ordered registration IDs per event name. The delegate owns the
    /// callback wrappers; this table preserves order so `off` and one-shot
    /// pruning can deregister by ID.
    listeners: HashMap<String, Vec<ListenerId>>,
    /// Positions within `listeners[name]` registered one-shot — pruned after
    /// the next dispatch of `name`.
    once_indices: HashMap<String, Vec<usize>>,
}

impl EventfulState {
    fn new() -> Self {
        Self {
            listeners: HashMap::new(),
            once_indices: HashMap::new(),
        }
    }
}

/// Compact a slot sequence by dropping vacated entries.
///
/// An absent input yields an empty sequence rather than failing.
fn remove_empty_elements<T>(slots: Option<Vec<Option<T>>>) -> Vec<T> {
    slots
        .map(|v| v.into_iter().flatten().collect())
        .unwrap_or_default()
}

// ============================================================================
// Eventful
// ============================================================================

/// Per-instance pub/sub state with synchronous dispatch.
///
/// Owning types embed an `Eventful` by composition (see
/// [`crate::AsEventful`]) or wrap a value with [`crate::eventify`].
pub struct Eventful {
    state: Mutex<EventfulState>,
    /// Owned exclusively by this instance; created at construction, never
    /// shared across instances.
    target: DispatchTarget,
}

impl Eventful {
    /// Create an instance with empty tables and a fresh delegate.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(EventfulState::new()),
            target: DispatchTarget::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Register `callback` for `name`.
    ///
    /// Appends to the listener table and registers with the delegate. No
    /// uniqueness constraint: registering the same logic twice creates two
    /// independent entries, both of which will be invoked.
    ///
    /// # Errors
    ///
    /// [`EventfulError::EmptyEventName`] if `name` is empty.
    pub fn on(&self, name: &str, callback: impl Fn(&Event) + Send + Sync + 'static) -> Result<()> {
        self.register(name, Arc::new(callback), false)
    }

    /// Register `callback` for `name`, to fire at most once.
    ///
    /// Same as [`Eventful::on`], but the entry's position is recorded in the
    /// once-index table and the delegate is told to auto-deregister after the
    /// first invocation. After `name` next fires, the entry is removed and
    /// its once-index membership cleared.
    ///
    /// # Errors
    ///
    /// [`EventfulError::EmptyEventName`] if `name` is empty.
    pub fn once(
        &self,
        name: &str,
        callback: impl Fn(&Event) + Send + Sync + 'static,
    ) -> Result<()> {
        self.register(name, Arc::new(callback), true)
    }

    fn register(&self, name: &str, callback: Arc<ListenerFn>, once: bool) -> Result<()> {
        if name.is_empty() {
            return Err(EventfulError::EmptyEventName);
        }

        let id = self
            .target
            .add_listener(name, callback, ListenerOptions { once });

        let mut st = self.state.lock();
        let entries = st.listeners.entry(name.to_string()).or_default();
        entries.push(id);
        if once {
            let position = entries.len() - 1;
            st.once_indices
                .entry(name.to_string())
                .or_default()
                .push(position);
        }
        Ok(())
    }

    /// Remove *all* listeners (persistent and one-shot) registered for
    /// `name`.
    ///
    /// Each entry is deregistered from the delegate, then both tables are
    /// cleared for `name`. A name with no prior registrations is a no-op.
    pub fn off(&self, name: &str) {
        let removed = {
            let mut st = self.state.lock();
            st.once_indices.remove(name);
            st.listeners.remove(name).unwrap_or_default()
        };
        // State lock released — the delegate takes its own lock.
        for id in removed {
            self.target.remove_listener(name, id);
        }
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Build an [`Event`] wrapping `detail` (`{}` when `None`) and dispatch
    /// it synchronously to all currently registered listeners for `name`, in
    /// registration order.
    ///
    /// All listeners run before this returns. Dispatch with zero listeners
    /// is a no-op, not an error. After dispatch, every one-shot entry
    /// recorded for `name` is removed from the listener table (slots vacated
    /// then compacted) and deregistered from the delegate.
    ///
    /// A panicking listener propagates to the caller and interrupts delivery
    /// to later listeners; in that case one-shot pruning for this round does
    /// not run until the next dispatch of `name`.
    ///
    /// # Errors
    ///
    /// [`EventfulError::EmptyEventName`] if `name` is empty.
    pub fn fire_event(&self, name: &str, detail: Option<Value>) -> Result<()> {
        if name.is_empty() {
            return Err(EventfulError::EmptyEventName);
        }

        let event = Event::new(name, detail);
        self.target.dispatch(&event);
        self.prune_once_entries(name);
        Ok(())
    }

    /// Drop the entries recorded in the once-index table for `name` and
    /// deregister them from the delegate.
    fn prune_once_entries(&self, name: &str) {
        let removed: Vec<ListenerId> = {
            let mut st = self.state.lock();
            let positions = match st.once_indices.remove(name) {
                Some(positions) if !positions.is_empty() => positions,
                _ => return,
            };

            let mut slots: Vec<Option<ListenerId>> = st
                .listeners
                .remove(name)
                .map(|entries| entries.into_iter().map(Some).collect())
                .unwrap_or_default();

            let mut removed = Vec::with_capacity(positions.len());
            for position in positions {
                if let Some(slot) = slots.get_mut(position) {
                    if let Some(id) = slot.take() {
                        removed.push(id);
                    }
                }
            }

            let compacted = remove_empty_elements(Some(slots));
            if !compacted.is_empty() {
                st.listeners.insert(name.to_string(), compacted);
            }
            removed
        };

        // The delegate already shed native-once registrations during
        // dispatch; remove_listener tolerates the missing IDs.
        for id in removed {
            self.target.remove_listener(name, id);
        }
    }

    // -----------------------------------------------------------------------
    // Introspection
    // -----------------------------------------------------------------------

    /// Whether any event name currently has at least one listener entry.
    pub fn has_listeners(&self) -> bool {
        self.state
            .lock()
            .listeners
            .values()
            .any(|entries| !entries.is_empty())
    }

    /// Snapshot of the listener table: registration IDs per event name, in
    /// registration order.
    pub fn listeners(&self) -> HashMap<String, Vec<ListenerId>> {
        self.state.lock().listeners.clone()
    }

    // -----------------------------------------------------------------------
    // Reset
    // -----------------------------------------------------------------------

    /// Re-run initialization: clear both tables and every delegate
    /// registration, discarding all prior registrations.
    ///
    /// Callers that reach this through repeated [`crate::eventify`]
    /// application lose their listeners silently — a documented risk of the
    /// adapter contract, surfaced here as a warning rather than guarded
    /// against.
    pub fn reset(&self) {
        let discarded = {
            let mut st = self.state.lock();
            let count: usize = st.listeners.values().map(Vec::len).sum();
            st.listeners.clear();
            st.once_indices.clear();
            count
        };
        self.target.clear();

        if discarded > 0 {
            tracing::warn!(
                discarded,
                "reset discarded live listener registrations — re-register after re-initializing"
            );
        }
    }
}

impl Default for Eventful {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests — private helpers
// ============================================================================
