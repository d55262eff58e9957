//! General utilities for spacebar.
//!
//! - [`debounce`]: [`DebouncingNotifier`], coalescing bursts of change signals.
//! - [`disposer`]: [`Disposer`] and [`DisposerList`] for scoped subscriptions.
//! - [`paths`]: XDG-based application directories.

pub mod debounce;
pub mod disposer;
pub mod paths;

pub use debounce::DebouncingNotifier;
pub use disposer::{Disposer, DisposerList};
