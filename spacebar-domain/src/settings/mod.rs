//! Typed reactive settings.
//!
//! A [`SettingsStore`] persists raw [`SettingValue`]s. [`ReactiveSetting`] binds
//! one key to a Rust type and implements [`Observable`]; [`Settings`] groups the
//! cells spacebar uses.

mod cell;
mod errors;
mod schema;
mod store;
mod value;

pub use cell::{Observable, ReactiveSetting, ValueCallback};
pub use errors::SettingsError;
pub use schema::{
    ScrollWheelMode, Settings, WorkspaceNamesMap, DYNAMIC_WORKSPACES_KEY,
    ENABLE_ACTIVATE_WORKSPACE_SHORTCUTS_KEY, ENABLE_MOVE_TO_WORKSPACE_SHORTCUTS_KEY,
    SCROLL_WHEEL_KEY, SHOW_EMPTY_WORKSPACES_KEY, SMART_WORKSPACE_NAMES_KEY,
    WORKSPACE_NAMES_KEY, WORKSPACE_NAMES_MAP_KEY,
};
pub use store::{ChangeHandler, InMemorySettingsStore, SettingsStore};
pub use value::{Json, SettingKind, SettingType, SettingValue};
