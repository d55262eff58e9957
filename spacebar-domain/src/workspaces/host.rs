//! Window-manager services the workspace engine is driven by.
//!
//! These traits are the only way spacebar talks to the compositor. Events are
//! delivered synchronously from the host's event loop through the handlers
//! registered with `connect_events`.

use spacebar_core::{AppIdentifier, Disposer};
use std::fmt;
use std::sync::Arc;

/// Identifies a window for the lifetime of the host session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    pub id: WindowId,
    /// The owning application, if the host can tell.
    pub app_id: Option<AppIdentifier>,
    /// Sticky windows appear on every workspace and never count towards one.
    pub on_all_workspaces: bool,
}

/// Change notifications emitted by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The workspace at this index was removed. Followed by [`HostEvent::WorkspaceCountChanged`].
    WorkspaceRemoved(usize),
    WorkspaceCountChanged,
    ActiveWorkspaceChanged,
    /// The window stacking order changed.
    Restacked,
    TrackedWindowsChanged,
}

pub type HostEventHandler = Arc<dyn Fn(HostEvent) + Send + Sync + 'static>;

/// The compositor's workspace list.
pub trait WorkspaceManager: Send + Sync {
    fn workspace_count(&self) -> usize;

    fn active_workspace_index(&self) -> usize;

    /// Whether a workspace exists at `index`.
    fn has_workspace(&self, index: usize) -> bool {
        index < self.workspace_count()
    }

    fn activate_workspace(&self, index: usize, timestamp: u32);

    /// Activates the workspace at `index` and focuses `window` on it.
    fn activate_workspace_with_focus(&self, index: usize, window: WindowId, timestamp: u32);

    fn append_workspace(&self, activate: bool, timestamp: u32);

    fn remove_workspace(&self, index: usize, timestamp: u32);

    fn reorder_workspace(&self, index: usize, new_index: usize);

    /// Subscribes to [`HostEvent::WorkspaceRemoved`], [`HostEvent::WorkspaceCountChanged`],
    /// [`HostEvent::ActiveWorkspaceChanged`] and [`HostEvent::Restacked`].
    fn connect_events(&self, handler: HostEventHandler) -> Disposer;
}

/// Window enumeration and focus.
pub trait WindowTracker: Send + Sync {
    /// Windows on the workspace at `index`, most recently used first.
    fn windows_on_workspace(&self, index: usize) -> Vec<WindowInfo>;

    fn focused_window(&self) -> Option<WindowInfo>;

    fn move_window_to_workspace(&self, window: WindowId, index: usize);

    /// Subscribes to [`HostEvent::TrackedWindowsChanged`].
    fn connect_events(&self, handler: HostEventHandler) -> Disposer;
}

/// Shell chrome outside the workspace bar.
pub trait Shell: Send + Sync {
    /// The current event timestamp.
    fn current_time(&self) -> u32;

    fn is_overview_visible(&self) -> bool;

    fn show_overview(&self);

    fn toggle_overview(&self);

    /// Shows or hides the panel's activities button.
    fn set_activities_visible(&self, visible: bool);

    fn is_session_locked(&self) -> bool;
}

/// The host services handed to the workspace engine.
#[derive(Clone)]
pub struct HostServices {
    pub workspaces: Arc<dyn WorkspaceManager>,
    pub windows: Arc<dyn WindowTracker>,
    pub shell: Arc<dyn Shell>,
}

impl HostServices {
    /// Windows on `index` that belong to that workspace alone.
    pub fn own_windows_on_workspace(&self, index: usize) -> Vec<WindowInfo> {
        self.windows
            .windows_on_workspace(index)
            .into_iter()
            .filter(|window| !window.on_all_workspaces)
            .collect()
    }

    /// Shows or hides the activities button. It is never shown on a locked session.
    pub fn show_activities(&self, show: bool) {
        self.shell.set_activities_visible(show && !self.shell.is_session_locked());
    }
}

impl fmt::Debug for HostServices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostServices")
            .field("workspace_count", &self.workspaces.workspace_count())
            .field("active_workspace_index", &self.workspaces.active_workspace_index())
            .finish_non_exhaustive()
    }
}
