//! Eventful — synchronous pub/sub capability for arbitrary values.
//!
//! # Overview
//!
//! [`Eventful`] maintains per-instance listener state (`on` / `once` / `off`)
//! and drives dispatch (`fire_event`) through an owned [`DispatchTarget`]
//! delegate. Listeners receive an [`Event`] carrying a `detail` payload.
//!
//! Two adapters grant the capability to foreign types: the [`AsEventful`]
//! trait for types that embed an `Eventful` by composition, and
//! [`eventify`] / [`Eventify`] for wrapping an existing value at runtime.
//!
//! # Modules
//!
//! - [`event`] — [`Event`] value delivered to listeners.
//! - [`dispatch`] — [`DispatchTarget`] delegate and [`ListenerId`].
//! - [`eventful`] — [`Eventful`] core.
//! - [`adapt`] — [`AsEventful`] and [`Eventify`].
//! - [`error`] — [`EventfulError`].

pub mod adapt;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod eventful;

pub use adapt::{eventify, AsEventful, Eventify};
pub use dispatch::{DispatchTarget, ListenerId, ListenerOptions};
pub use error::{EventfulError, Result};
pub use event::Event;
pub use eventful::Eventful;
