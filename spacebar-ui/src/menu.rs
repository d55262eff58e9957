//! The bar's companion menu: rename the current workspace, jump to hidden
//! workspaces, add or remove workspaces and open the preferences.

use parking_lot::Mutex;
use spacebar_core::DisposerList;
use std::sync::{Arc, Weak};
use tracing::debug;

use crate::widget::{MenuAction, MenuItem, MenuView};
use spacebar_domain::{ActivateOptions, KeyBindings, Observable, Workspaces};

pub const HIDDEN_WORKSPACES_HEADING: &str = "Hidden workspaces";
pub const ADD_WORKSPACE_LABEL: &str = "Add new workspace";
pub const REMOVE_WORKSPACE_LABEL: &str = "Remove current workspace";

pub struct WorkspacesBarMenu {
    workspaces: Arc<Workspaces>,
    view: Arc<dyn MenuView>,
    /// The current workspace's name when the menu was opened.
    name_on_open: Mutex<String>,
    subscriptions: DisposerList,
}

impl WorkspacesBarMenu {
    pub fn new(workspaces: Arc<Workspaces>, view: Arc<dyn MenuView>) -> Arc<Self> {
        Arc::new(Self {
            workspaces,
            view,
            name_on_open: Mutex::new(String::new()),
            subscriptions: DisposerList::new(),
        })
    }

    pub fn init(self: &Arc<Self>, key_bindings: &KeyBindings) {
        let settings = self.workspaces.settings();
        for setting in [&settings.show_empty_workspaces, &settings.dynamic_workspaces] {
            let weak: Weak<Self> = Arc::downgrade(self);
            self.subscriptions.push(setting.subscribe(
                Arc::new(move |_: &bool| {
                    if let Some(this) = weak.upgrade() {
                        this.refresh_manage_section();
                    }
                }),
                false,
            ));
        }
        self.refresh_manage_section();

        let view = self.view.clone();
        key_bindings.add_key_binding("open-menu", move || view.open());
    }

    /// Forwarded from the view whenever the menu opens or closes.
    pub fn on_open_state_changed(&self, open: bool) {
        let snapshot = self.workspaces.snapshot();
        if open {
            let name = snapshot.current().and_then(|slot| slot.name.clone()).unwrap_or_default();
            self.view.set_entry_text(&name);
            *self.name_on_open.lock() = name;
            self.refresh_hidden_section();
        } else {
            let new_name = self.view.entry_text();
            let changed = *self.name_on_open.lock() != new_name;
            if changed {
                debug!(index = snapshot.current_index, name = %new_name, "Renaming current workspace");
                self.workspaces.rename_workspace(snapshot.current_index, &new_name);
            }
        }
    }

    /// Confirming the rename entry closes the menu, which applies the name.
    pub fn on_entry_activated(&self) {
        self.view.close();
    }

    pub fn activate_item(&self, action: MenuAction) {
        match action {
            MenuAction::ActivateWorkspace(index) => {
                self.view.close();
                self.workspaces.activate(index, ActivateOptions::default());
            }
            MenuAction::AddWorkspace => {
                self.view.close();
                self.workspaces.add_workspace();
            }
            MenuAction::RemoveCurrentWorkspace => {
                let current = self.workspaces.snapshot().current_index;
                self.workspaces.remove_workspace(current);
            }
            MenuAction::OpenPreferences => {
                self.view.close();
                self.view.open_preferences();
            }
        }
    }

    fn refresh_hidden_section(&self) {
        let settings = self.workspaces.settings();
        if settings.show_empty_workspaces.value() || settings.dynamic_workspaces.value() {
            self.view.set_hidden_workspaces(Vec::new());
            return;
        }
        let snapshot = self.workspaces.snapshot();
        let mut items: Vec<MenuItem> = snapshot
            .hidden_workspaces()
            .map(|slot| MenuItem::Action {
                label: snapshot.display_name(slot),
                action: MenuAction::ActivateWorkspace(slot.index),
            })
            .collect();
        if !items.is_empty() {
            items.insert(0, MenuItem::Heading(HIDDEN_WORKSPACES_HEADING.to_string()));
        }
        self.view.set_hidden_workspaces(items);
    }

    fn refresh_manage_section(&self) {
        let settings = self.workspaces.settings();
        let mut items = Vec::with_capacity(2);
        if !settings.dynamic_workspaces.value() || !settings.show_empty_workspaces.value() {
            items.push(MenuItem::Action {
                label: ADD_WORKSPACE_LABEL.to_string(),
                action: MenuAction::AddWorkspace,
            });
        }
        items.push(MenuItem::Action {
            label: REMOVE_WORKSPACE_LABEL.to_string(),
            action: MenuAction::RemoveCurrentWorkspace,
        });
        self.view.set_manage_workspaces(items);
    }

    pub fn destroy(&self) {
        self.subscriptions.dispose_all();
    }
}
