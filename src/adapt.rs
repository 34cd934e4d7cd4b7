//! Adapters that grant the Eventful capability set to foreign types.
//!
//! The JS original splices methods into an object's prototype chain at
//! runtime. Here the capability is modeled as composition: an owning type
//! embeds an [`Eventful`] and exposes it through [`AsEventful`], whose
//! provided methods forward the whole capability set. [`eventify`] covers
//! the remaining case — granting the capability to an existing value the
//! caller does not control — by pairing it with a fresh `Eventful` in a
//! wrapper that derefs to the original.

use std::ops::{Deref, DerefMut};

use serde_json::Value;

use crate::error::Result;
use crate::event::Event;
use crate::eventful::Eventful;

// ============================================================================
// AsEventful — capability set for composing types
// ============================================================================

/// Grants the Eventful capability set to any type that embeds an
/// [`Eventful`].
///
/// Implementors supply [`AsEventful::eventful`]; the registration and
/// dispatch methods forward to it.
///
/// ```
/// use eventful::{AsEventful, Eventful};
///
/// struct Uploader {
///     events: Eventful,
/// }
///
/// impl AsEventful for Uploader {
///     fn eventful(&self) -> &Eventful {
///         &self.events
///     }
/// }
///
/// let uploader = Uploader { events: Eventful::new() };
/// uploader.on("progress", |event| {
///     let _ = event.detail();
/// }).unwrap();
/// uploader.fire_event("progress", None).unwrap();
/// ```
pub trait AsEventful {
    /// The embedded event state this type forwards to.
    fn eventful(&self) -> &Eventful;

    /// Forward of [`Eventful::on`].
    fn on(&self, name: &str, callback: impl Fn(&Event) + Send + Sync + 'static) -> Result<()> {
        self.eventful().on(name, callback)
    }

    /// Forward of [`Eventful::once`].
    fn once(&self, name: &str, callback: impl Fn(&Event) + Send + Sync + 'static) -> Result<()> {
        self.eventful().once(name, callback)
    }

    /// Forward of [`Eventful::off`].
    fn off(&self, name: &str) {
        self.eventful().off(name);
    }

    /// Forward of [`Eventful::fire_event`].
    fn fire_event(&self, name: &str, detail: Option<Value>) -> Result<()> {
        self.eventful().fire_event(name, detail)
    }

    /// Forward of [`Eventful::has_listeners`].
    fn has_listeners(&self) -> bool {
        self.eventful().has_listeners()
    }
}

// ============================================================================
// Eventify — wrap an existing value
// ============================================================================

/// An arbitrary value paired with its own fresh [`Eventful`].
///
/// Derefs to the wrapped value, so existing methods stay reachable alongside
/// the capability set.
pub struct Eventify<T> {
    inner: T,
    events: Eventful,
}

impl<T> Eventify<T> {
    /// Recover the wrapped value, dropping the event state.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> AsEventful for Eventify<T> {
    fn eventful(&self) -> &Eventful {
        &self.events
    }
}

impl<T> Deref for Eventify<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T> DerefMut for Eventify<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}

/// Pair `inner` with a fresh, empty [`Eventful`].
///
/// Not idempotent: applying `eventify` to an already-wrapped value nests it
/// under another fresh `Eventful`, and the outer capability shadows the
/// inner one — prior registrations are no longer reachable or fired through
/// the returned wrapper. The same applies to [`Eventful::reset`], which
/// re-initializes in place. Both discard listener state by design; callers
/// re-register afterwards.
pub fn eventify<T>(inner: T) -> Eventify<T> {
    Eventify {
        inner,
        events: Eventful::new(),
    }
}
