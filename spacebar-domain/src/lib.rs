//! # Spacebar Domain Library (`spacebar-domain`)
//!
//! Workspace tracking for the spacebar workspace bar.
//!
//! - [`settings`]: the typed, reactive view of the persisted settings.
//! - [`workspaces`]: host interfaces, workspace names and the [`Workspaces`]
//!   engine that derives the [`WorkspacesSnapshot`] the bar renders.
//! - [`keybindings`]: global shortcuts driving the engine.
//!
//! With the `test-support` feature, [`testing::FakeHost`] provides an
//! in-process window manager for tests.

pub mod error;
pub mod keybindings;
pub mod settings;
pub mod workspaces;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::DomainError;
pub use keybindings::{KeyBindingHandler, KeyBindingRegistrar, KeyBindings};
pub use settings::{Observable, ReactiveSetting, ScrollWheelMode, Settings, SettingsError, SettingsStore};
pub use workspaces::{
    ActivateOptions, HostEvent, HostServices, UpdateReason, WindowId, WorkspaceSlot, Workspaces,
    WorkspacesSnapshot,
};
