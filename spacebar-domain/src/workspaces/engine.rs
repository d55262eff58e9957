//! The workspace state engine.
//!
//! [`Workspaces`] follows the host's workspace list and the relevant settings,
//! keeps one derived [`WorkspacesSnapshot`] and tells listeners about changes
//! through a debounced update feed. A second debounced feed settles smart
//! workspace names once window changes have calmed down.

use parking_lot::Mutex;
use spacebar_core::{BarConfig, DebouncingNotifier, DisposerList};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, info, trace};

use super::host::{HostEvent, HostServices};
use super::names::WorkspaceNameStore;
use super::state::{SnapshotInputs, UpdateReason, WorkspaceSlot, WorkspacesSnapshot};
use crate::settings::{Observable, Settings};

/// Options for [`Workspaces::activate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivateOptions {
    /// When activating the current workspace while a window shown on all
    /// workspaces has focus, focus this workspace's own window instead of
    /// toggling the overview.
    pub focus_window_if_current_workspace: bool,
}

pub struct Workspaces {
    settings: Arc<Settings>,
    host: HostServices,
    names: WorkspaceNameStore,
    snapshot: Mutex<Arc<WorkspacesSnapshot>>,
    previous_workspace: AtomicUsize,
    /// Set by `WorkspaceRemoved`; swallows the count change that follows it.
    removal_handled: AtomicBool,
    update_notifier: DebouncingNotifier,
    smart_names_notifier: DebouncingNotifier,
    connections: DisposerList,
    destroyed: AtomicBool,
}

impl Workspaces {
    pub fn new(settings: Arc<Settings>, host: HostServices, config: &BarConfig) -> Arc<Self> {
        Arc::new(Self {
            names: WorkspaceNameStore::new(settings.clone(), host.clone()),
            settings,
            host,
            snapshot: Mutex::new(Arc::new(WorkspacesSnapshot::empty())),
            previous_workspace: AtomicUsize::new(0),
            removal_handled: AtomicBool::new(false),
            update_notifier: DebouncingNotifier::new(config.update_delay()),
            smart_names_notifier: DebouncingNotifier::new(config.smart_names_delay()),
            connections: DisposerList::new(),
            destroyed: AtomicBool::new(false),
        })
    }

    /// Connects to the host and the settings and computes the first snapshot.
    pub fn init(self: &Arc<Self>) {
        let weak: Weak<Self> = Arc::downgrade(self);

        let on_host_event = {
            let weak = weak.clone();
            Arc::new(move |event: HostEvent| {
                if let Some(this) = weak.upgrade() {
                    this.on_host_event(event);
                }
            })
        };
        self.connections.push(self.host.workspaces.connect_events(on_host_event.clone()));
        self.connections.push(self.host.windows.connect_events(on_host_event));

        self.connections.push(self.settings.workspace_names.subscribe(
            self.updater(UpdateReason::WorkspaceNamesChanged),
            false,
        ));
        self.connections.push(self.settings.show_empty_workspaces.subscribe(
            self.updater(UpdateReason::NumberOfWorkspacesChanged),
            false,
        ));
        self.connections.push(self.settings.dynamic_workspaces.subscribe(
            self.updater(UpdateReason::NumberOfWorkspacesChanged),
            false,
        ));

        self.update(None);

        let clear_weak = weak.clone();
        self.connections.push(self.settings.smart_workspace_names.subscribe(
            Arc::new(move |enabled: &bool| {
                if *enabled {
                    if let Some(this) = clear_weak.upgrade() {
                        this.clear_empty_workspace_names();
                    }
                }
            }),
            true,
        ));
        self.smart_names_notifier.subscribe(move || {
            if let Some(this) = weak.upgrade() {
                this.update_smart_workspace_names();
            }
        });
        info!(workspaces = self.snapshot().number_of_enabled_workspaces, "Workspace engine initialized");
    }

    fn updater<T: 'static>(self: &Arc<Self>, reason: UpdateReason) -> Arc<dyn Fn(&T) + Send + Sync> {
        let weak = Arc::downgrade(self);
        Arc::new(move |_: &T| {
            if let Some(this) = weak.upgrade() {
                this.update(Some(reason));
            }
        })
    }

    /// Disconnects from host and settings and drops all listeners. Idempotent.
    pub fn destroy(&self) {
        if self.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.connections.dispose_all();
        self.update_notifier.destroy();
        self.smart_names_notifier.destroy();
        debug!("Workspace engine destroyed");
    }

    /// Registers `callback` for the coalesced notification sent after recomputations.
    pub fn on_update<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.update_notifier.subscribe(callback);
    }

    /// The latest snapshot. Each recomputation replaces it wholesale.
    pub fn snapshot(&self) -> Arc<WorkspacesSnapshot> {
        self.snapshot.lock().clone()
    }

    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    pub fn host(&self) -> &HostServices {
        &self.host
    }

    pub fn names(&self) -> &WorkspaceNameStore {
        &self.names
    }

    pub fn activate(&self, index: usize, options: ActivateOptions) {
        let workspaces = &self.host.workspaces;
        if workspaces.active_workspace_index() == index {
            let sticky_window_focused = options.focus_window_if_current_workspace
                && self
                    .host
                    .windows
                    .focused_window()
                    .map_or(false, |window| window.on_all_workspaces);
            if sticky_window_focused {
                self.focus_most_recent_window_on_workspace(index);
            } else {
                self.host.shell.toggle_overview();
            }
        } else if workspaces.has_workspace(index) {
            debug!(index, "Activating workspace");
            workspaces.activate_workspace(index, self.host.shell.current_time());
            self.focus_most_recent_window_on_workspace(index);
            let has_windows = self.snapshot().get(index).map_or(false, |slot| slot.has_windows);
            if !self.host.shell.is_overview_visible() && !has_windows {
                self.host.shell.show_overview();
            }
        } else {
            trace!(index, "No workspace to activate");
        }
    }

    /// Activates the workspace that was current before the last switch.
    pub fn activate_previous(&self) {
        self.activate(self.previous_workspace.load(Ordering::SeqCst), ActivateOptions::default());
    }

    pub fn add_workspace(&self) {
        if self.settings.dynamic_workspaces.value() {
            if let Some(last) = self.snapshot().number_of_enabled_workspaces.checked_sub(1) {
                self.activate(last, ActivateOptions::default());
            }
        } else {
            self.host.workspaces.append_workspace(true, self.host.shell.current_time());
            self.host.shell.show_overview();
        }
    }

    pub fn remove_workspace(&self, index: usize) {
        if self.host.workspaces.has_workspace(index) {
            debug!(index, "Removing workspace");
            self.host.workspaces.remove_workspace(index, self.host.shell.current_time());
        }
    }

    /// Moves the workspace at `old_index` to `new_index`. Names move first, so
    /// no update ever pairs moved workspaces with unmoved names.
    pub fn reorder_workspace(&self, old_index: usize, new_index: usize) {
        if old_index == new_index || !self.host.workspaces.has_workspace(old_index) {
            return;
        }
        debug!(old_index, new_index, "Reordering workspace");
        self.names.move_by_index(old_index, new_index);
        self.host.workspaces.reorder_workspace(old_index, new_index);
    }

    pub fn rename_workspace(&self, index: usize, name: &str) {
        self.names.rename(index, name);
    }

    pub fn display_name(&self, slot: &WorkspaceSlot) -> String {
        self.snapshot().display_name(slot)
    }

    /// Focuses the most recently used window that belongs to workspace `index` alone.
    pub fn focus_most_recent_window_on_workspace(&self, index: usize) {
        if let Some(window) = self.host.own_windows_on_workspace(index).first() {
            self.host.workspaces.activate_workspace_with_focus(
                index,
                window.id,
                self.host.shell.current_time(),
            );
        }
    }

    fn on_host_event(&self, event: HostEvent) {
        trace!(?event, "Host event");
        match event {
            HostEvent::WorkspaceRemoved(index) => {
                self.names.remove(index);
                self.update(None);
                self.removal_handled.store(true, Ordering::SeqCst);
            }
            HostEvent::WorkspaceCountChanged => {
                if !self.removal_handled.swap(false, Ordering::SeqCst) {
                    self.update(Some(UpdateReason::NumberOfWorkspacesChanged));
                }
            }
            HostEvent::ActiveWorkspaceChanged => {
                let current = self.snapshot().current_index;
                self.previous_workspace.store(current, Ordering::SeqCst);
                self.update(Some(UpdateReason::ActiveWorkspaceChanged));
                self.smart_names_notifier.notify();
            }
            HostEvent::Restacked => self.update(Some(UpdateReason::WindowsChanged)),
            HostEvent::TrackedWindowsChanged => {
                self.update(Some(UpdateReason::WindowsChanged));
                self.smart_names_notifier.notify();
            }
        }
    }

    /// Rebuilds the snapshot from live host and settings state.
    fn update(&self, reason: Option<UpdateReason>) {
        if self.destroyed.load(Ordering::SeqCst) {
            return;
        }
        let workspaces = &self.host.workspaces;
        let inputs = SnapshotInputs {
            enabled_count: workspaces.workspace_count(),
            current_index: workspaces.active_workspace_index(),
            dynamic_workspaces: self.settings.dynamic_workspaces.value(),
            show_empty_workspaces: self.settings.show_empty_workspaces.value(),
            names: self.settings.workspace_names.value(),
        };
        let snapshot = WorkspacesSnapshot::derive(&inputs, |index| {
            !self.host.own_windows_on_workspace(index).is_empty()
        });
        let reason = reason.map_or_else(|| "forced".to_string(), |r| r.to_string());
        trace!(
            reason = %reason,
            enabled = snapshot.number_of_enabled_workspaces,
            current = snapshot.current_index,
            last_visible = snapshot.last_visible_workspace,
            "Workspaces recomputed"
        );
        *self.snapshot.lock() = Arc::new(snapshot);
        self.update_notifier.notify();
    }

    /// Restores remembered names lowest index first, so when several
    /// workspaces compete for one app's names the first workspace gets the
    /// first remembered name.
    fn update_smart_workspace_names(&self) {
        if !self.settings.smart_workspace_names.value() {
            return;
        }
        let snapshot = self.snapshot();
        for slot in snapshot.workspaces.iter() {
            if slot.has_windows && !slot.has_name() {
                self.names.restore_smart_workspace_name(slot.index);
            }
            if snapshot.is_extra_dynamic_workspace(slot) {
                self.names.remove(slot.index);
            }
        }
    }

    /// Drops names that no longer describe a workspace. Runs highest index
    /// first so removals never shift a slot still to be visited.
    fn clear_empty_workspace_names(&self) {
        let snapshot = self.snapshot();
        for slot in snapshot.workspaces.iter().rev() {
            if (!slot.is_enabled || snapshot.is_extra_dynamic_workspace(slot)) && slot.name.is_some() {
                self.names.remove(slot.index);
            } else if !slot.has_windows && slot.has_name() {
                self.names.rename(slot.index, "");
            }
        }
    }
}

impl Drop for Workspaces {
    fn drop(&mut self) {
        self.destroy();
    }
}
