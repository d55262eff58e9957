//! Workspace names and smart-name memory.
//!
//! Names live in the `workspace-names` string array, one entry per workspace
//! index. The list is sparse by convention: empty strings keep later names
//! aligned with their workspaces. Every operation is a full
//! read-modify-write of that setting.

use std::sync::Arc;
use tracing::{debug, trace};

use super::host::HostServices;
use crate::settings::{Json, Observable, Settings};

/// Moves the entry at `old_index` to `new_index`, padding with empty strings
/// when `new_index` lies past the end.
pub fn move_name(names: &mut Vec<String>, old_index: usize, new_index: usize) {
    if old_index == new_index {
        return;
    }
    let element = if old_index < names.len() {
        names.remove(old_index)
    } else {
        String::new()
    };
    if new_index < names.len() {
        names.insert(new_index, element);
    } else {
        names.resize(new_index, String::new());
        names.push(element);
    }
}

/// Inserts `name` at `index`, padding with empty strings when `index` lies past the end.
pub fn insert_name(names: &mut Vec<String>, index: usize, name: String) {
    if index < names.len() {
        names.insert(index, name);
    } else {
        names.resize(index, String::new());
        names.push(name);
    }
}

/// Removes the entry at `index`. Out of range leaves the list unchanged.
pub fn remove_name(names: &mut Vec<String>, index: usize) {
    if index < names.len() {
        names.remove(index);
    }
}

fn set_name(names: &mut Vec<String>, index: usize, name: String) {
    if index >= names.len() {
        names.resize(index + 1, String::new());
    }
    names[index] = name;
}

/// Reads and writes workspace names through the settings.
pub struct WorkspaceNameStore {
    settings: Arc<Settings>,
    host: HostServices,
}

impl WorkspaceNameStore {
    pub fn new(settings: Arc<Settings>, host: HostServices) -> Self {
        Self { settings, host }
    }

    pub fn names(&self) -> Vec<String> {
        self.settings.workspace_names.value()
    }

    fn write(&self, names: Vec<String>) {
        trace!(?names, "Writing workspace names");
        self.settings.workspace_names.set_value(names);
    }

    pub fn insert(&self, index: usize, name: &str) {
        let mut names = self.names();
        insert_name(&mut names, index, name.to_string());
        self.write(names);
    }

    pub fn remove(&self, index: usize) {
        let mut names = self.names();
        if index >= names.len() {
            return;
        }
        remove_name(&mut names, index);
        self.write(names);
    }

    pub fn move_by_index(&self, old_index: usize, new_index: usize) {
        if old_index == new_index {
            return;
        }
        let mut names = self.names();
        move_name(&mut names, old_index, new_index);
        self.write(names);
    }

    /// Renames the workspace at `index`. With smart naming on, a non-empty name
    /// is also remembered for every application on that workspace.
    pub fn rename(&self, index: usize, new_name: &str) {
        let mut names = self.names();
        set_name(&mut names, index, new_name.to_string());
        self.write(names);
        if self.settings.smart_workspace_names.value() && !new_name.is_empty() {
            self.save_smart_workspace_name(index, new_name);
        }
    }

    /// Gives the workspace at `index` the first name remembered for one of its
    /// applications that no enabled workspace currently uses.
    pub fn restore_smart_workspace_name(&self, index: usize) {
        let map = self.settings.workspace_names_map.value().0;
        let enabled_names = self.enabled_workspace_names();
        for app_id in self.app_ids_on_workspace(index) {
            let candidate = map.get(&app_id).and_then(|remembered| {
                remembered.iter().find(|name| !enabled_names.contains(name)).cloned()
            });
            if let Some(name) = candidate {
                debug!(index, app_id = %app_id, name = %name, "Restoring smart workspace name");
                let mut names = self.names();
                set_name(&mut names, index, name);
                self.write(names);
                return;
            }
        }
    }

    fn save_smart_workspace_name(&self, index: usize, new_name: &str) {
        let mut map = self.settings.workspace_names_map.value().0;
        let enabled_names = self.enabled_workspace_names();
        for app_id in self.app_ids_on_workspace(index) {
            let remembered = map.entry(app_id).or_default();
            remembered.retain(|name| name != new_name && enabled_names.contains(name));
            remembered.push(new_name.to_string());
        }
        self.settings.workspace_names_map.set_value(Json(map));
    }

    fn app_ids_on_workspace(&self, index: usize) -> Vec<String> {
        let mut app_ids: Vec<String> = Vec::new();
        for window in self.host.own_windows_on_workspace(index) {
            if let Some(app_id) = window.app_id {
                let app_id = app_id.value().to_string();
                if !app_ids.contains(&app_id) {
                    app_ids.push(app_id);
                }
            }
        }
        app_ids
    }

    /// Names of the workspaces the host currently has.
    fn enabled_workspace_names(&self) -> Vec<String> {
        let count = self.host.workspaces.workspace_count();
        self.names().into_iter().take(count).collect()
    }
}
