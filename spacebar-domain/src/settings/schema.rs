//! The settings spacebar reads and writes, bound as reactive cells.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

use super::cell::ReactiveSetting;
use super::errors::SettingsError;
use super::store::{InMemorySettingsStore, SettingsStore};
use super::value::{Json, SettingKind, SettingType, SettingValue};

pub const WORKSPACE_NAMES_MAP_KEY: &str = "workspace-names-map";
pub const DYNAMIC_WORKSPACES_KEY: &str = "dynamic-workspaces";
pub const SHOW_EMPTY_WORKSPACES_KEY: &str = "show-empty-workspaces";
pub const SCROLL_WHEEL_KEY: &str = "scroll-wheel";
pub const SMART_WORKSPACE_NAMES_KEY: &str = "smart-workspace-names";
pub const ENABLE_ACTIVATE_WORKSPACE_SHORTCUTS_KEY: &str = "enable-activate-workspace-shortcuts";
pub const ENABLE_MOVE_TO_WORKSPACE_SHORTCUTS_KEY: &str = "enable-move-to-workspace-shortcuts";
pub const WORKSPACE_NAMES_KEY: &str = "workspace-names";

/// Application id to the workspace names previously used with it, oldest first.
pub type WorkspaceNamesMap = BTreeMap<String, Vec<String>>;

/// Which widget switches workspaces on scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScrollWheelMode {
    Panel,
    WorkspacesBar,
    Disabled,
}

impl ScrollWheelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrollWheelMode::Panel => "panel",
            ScrollWheelMode::WorkspacesBar => "workspaces-bar",
            ScrollWheelMode::Disabled => "disabled",
        }
    }
}

impl fmt::Display for ScrollWheelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScrollWheelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "panel" => Ok(ScrollWheelMode::Panel),
            "workspaces-bar" => Ok(ScrollWheelMode::WorkspacesBar),
            "disabled" => Ok(ScrollWheelMode::Disabled),
            other => Err(format!("unknown scroll-wheel mode '{}'", other)),
        }
    }
}

impl SettingType for ScrollWheelMode {
    const KIND: SettingKind = SettingKind::String;

    fn from_setting(value: &SettingValue) -> Result<Self, String> {
        String::from_setting(value)?.parse()
    }

    fn to_setting(&self) -> Result<SettingValue, String> {
        Ok(SettingValue::String(self.as_str().to_string()))
    }
}

/// All settings cells, bound to one store.
///
/// Constructed once by the composition root and shared by reference; there is
/// no global instance.
pub struct Settings {
    store: Arc<dyn SettingsStore>,
    pub workspace_names_map: ReactiveSetting<Json<WorkspaceNamesMap>>,
    pub dynamic_workspaces: ReactiveSetting<bool>,
    pub show_empty_workspaces: ReactiveSetting<bool>,
    pub scroll_wheel: ReactiveSetting<ScrollWheelMode>,
    pub smart_workspace_names: ReactiveSetting<bool>,
    pub enable_activate_workspace_shortcuts: ReactiveSetting<bool>,
    pub enable_move_to_workspace_shortcuts: ReactiveSetting<bool>,
    pub workspace_names: ReactiveSetting<Vec<String>>,
}

impl Settings {
    /// Binds every cell to `store`.
    ///
    /// # Errors
    ///
    /// Fails if a key is missing from the store or holds a value of the wrong type.
    pub fn bind(store: Arc<dyn SettingsStore>) -> Result<Arc<Self>, SettingsError> {
        let settings = Self {
            workspace_names_map: ReactiveSetting::bind(store.clone(), WORKSPACE_NAMES_MAP_KEY)?,
            dynamic_workspaces: ReactiveSetting::bind(store.clone(), DYNAMIC_WORKSPACES_KEY)?,
            show_empty_workspaces: ReactiveSetting::bind(store.clone(), SHOW_EMPTY_WORKSPACES_KEY)?,
            scroll_wheel: ReactiveSetting::bind(store.clone(), SCROLL_WHEEL_KEY)?,
            smart_workspace_names: ReactiveSetting::bind(store.clone(), SMART_WORKSPACE_NAMES_KEY)?,
            enable_activate_workspace_shortcuts: ReactiveSetting::bind(
                store.clone(),
                ENABLE_ACTIVATE_WORKSPACE_SHORTCUTS_KEY,
            )?,
            enable_move_to_workspace_shortcuts: ReactiveSetting::bind(
                store.clone(),
                ENABLE_MOVE_TO_WORKSPACE_SHORTCUTS_KEY,
            )?,
            workspace_names: ReactiveSetting::bind(store.clone(), WORKSPACE_NAMES_KEY)?,
            store,
        };
        debug!("Settings bound");
        Ok(Arc::new(settings))
    }

    /// The schema defaults, as installed by the desktop's settings schemas.
    pub fn default_values() -> Vec<(&'static str, SettingValue)> {
        vec![
            (WORKSPACE_NAMES_MAP_KEY, SettingValue::String("{}".to_string())),
            (DYNAMIC_WORKSPACES_KEY, SettingValue::Boolean(true)),
            (SHOW_EMPTY_WORKSPACES_KEY, SettingValue::Boolean(false)),
            (SCROLL_WHEEL_KEY, SettingValue::String(ScrollWheelMode::Panel.as_str().to_string())),
            (SMART_WORKSPACE_NAMES_KEY, SettingValue::Boolean(false)),
            (ENABLE_ACTIVATE_WORKSPACE_SHORTCUTS_KEY, SettingValue::Boolean(true)),
            (ENABLE_MOVE_TO_WORKSPACE_SHORTCUTS_KEY, SettingValue::Boolean(false)),
            (WORKSPACE_NAMES_KEY, SettingValue::StringArray(Vec::new())),
        ]
    }

    /// A fresh in-memory store populated with [`Settings::default_values`].
    pub fn default_store() -> InMemorySettingsStore {
        InMemorySettingsStore::with_defaults(Self::default_values())
    }

    pub fn store(&self) -> &Arc<dyn SettingsStore> {
        &self.store
    }

    /// Disconnects every cell from the store. Idempotent.
    pub fn destroy(&self) {
        self.workspace_names_map.destroy();
        self.dynamic_workspaces.destroy();
        self.show_empty_workspaces.destroy();
        self.scroll_wheel.destroy();
        self.smart_workspace_names.destroy();
        self.enable_activate_workspace_shortcuts.destroy();
        self.enable_move_to_workspace_shortcuts.destroy();
        self.workspace_names.destroy();
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("dynamic_workspaces", &self.dynamic_workspaces)
            .field("show_empty_workspaces", &self.show_empty_workspaces)
            .field("scroll_wheel", &self.scroll_wheel)
            .field("smart_workspace_names", &self.smart_workspace_names)
            .field("workspace_names", &self.workspace_names)
            .finish_non_exhaustive()
    }
}
