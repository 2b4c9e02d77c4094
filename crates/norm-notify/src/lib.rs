//! Change notification for the norm client cache.
//!
//! Views subscribe to the cache through the [`Notifier`]: every successful
//! write to the normalized store or the query-result cache emits a
//! [`ChangeEvent`], and the notifier fans it out to every subscriber whose
//! [`EventFilter`] matches. Rendering is out of scope; consumers only learn
//! *what* changed, never *how* to redraw it.
//!
//! # Modules
//!
//! - [`event`] — [`ChangeEvent`], [`ChangeKind`], [`EventFilter`]
//! - [`notifier`] — The [`Notifier`] fan-out router

pub mod event;
pub mod notifier;

pub use event::{ChangeEvent, ChangeKind, EventFilter};
pub use notifier::{ChangeStream, Notifier, NotifierConfig};
