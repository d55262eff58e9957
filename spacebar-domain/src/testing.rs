//! An in-process stand-in for the window manager.
//!
//! [`FakeHost`] implements [`WorkspaceManager`], [`WindowTracker`] and [`Shell`]
//! over plain state and emits the same event sequences the compositor does:
//! removing a workspace emits [`HostEvent::WorkspaceRemoved`] followed by
//! [`HostEvent::WorkspaceCountChanged`]. Events are delivered synchronously
//! with no internal lock held, so handlers may call straight back into the host.
//! Every command is recorded as a [`HostCall`].

use parking_lot::Mutex;
use spacebar_core::{AppIdentifier, Disposer};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use crate::workspaces::{
    HostEvent, HostEventHandler, HostServices, Shell, WindowId, WindowInfo, WindowTracker,
    WorkspaceManager,
};

/// A command issued to the fake host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    ActivateWorkspace(usize),
    ActivateWorkspaceWithFocus(usize, WindowId),
    AppendWorkspace { activate: bool },
    RemoveWorkspace(usize),
    ReorderWorkspace(usize, usize),
    MoveWindow(WindowId, usize),
    ShowOverview,
    ToggleOverview,
    SetActivitiesVisible(bool),
}

#[derive(Default)]
struct FakeHostState {
    /// Per workspace, most recently used first.
    workspaces: Vec<Vec<WindowInfo>>,
    sticky: Vec<WindowInfo>,
    active: usize,
    focused: Option<WindowId>,
    overview_visible: bool,
    activities_visible: bool,
    session_locked: bool,
    time: u32,
    next_window_id: u64,
    calls: Vec<HostCall>,
}

#[derive(Default)]
struct Handlers {
    entries: Mutex<Vec<(u64, HostEventHandler)>>,
}

impl Handlers {
    fn snapshot(&self) -> Vec<HostEventHandler> {
        self.entries.lock().iter().map(|(_, h)| h.clone()).collect()
    }
}

/// A scriptable window manager for tests.
pub struct FakeHost {
    state: Mutex<FakeHostState>,
    workspace_handlers: Arc<Handlers>,
    window_handlers: Arc<Handlers>,
    next_handler_id: AtomicU64,
}

impl FakeHost {
    /// A host with `workspace_count` empty workspaces, the first one active.
    pub fn new(workspace_count: usize) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(FakeHostState {
                workspaces: vec![Vec::new(); workspace_count],
                activities_visible: true,
                time: 1000,
                next_window_id: 1,
                ..FakeHostState::default()
            }),
            workspace_handlers: Arc::new(Handlers::default()),
            window_handlers: Arc::new(Handlers::default()),
            next_handler_id: AtomicU64::new(1),
        })
    }

    pub fn services(self: &Arc<Self>) -> HostServices {
        HostServices {
            workspaces: self.clone(),
            windows: self.clone(),
            shell: self.clone(),
        }
    }

    fn emit(handlers: &Handlers, event: HostEvent) {
        for handler in handlers.snapshot() {
            handler(event);
        }
    }

    fn emit_workspace_event(&self, event: HostEvent) {
        Self::emit(&self.workspace_handlers, event);
    }

    fn emit_window_event(&self, event: HostEvent) {
        Self::emit(&self.window_handlers, event);
    }

    fn new_window(&self, app_id: Option<&str>, on_all_workspaces: bool) -> WindowInfo {
        let mut state = self.state.lock();
        let id = WindowId(state.next_window_id);
        state.next_window_id += 1;
        WindowInfo {
            id,
            app_id: app_id.and_then(|app| AppIdentifier::new(app).ok()),
            on_all_workspaces,
        }
    }

    /// Opens a window on `workspace` as its most recently used window.
    pub fn add_window(&self, workspace: usize, app_id: Option<&str>) -> WindowId {
        let window = self.new_window(app_id, false);
        let id = window.id;
        {
            let mut state = self.state.lock();
            if let Some(windows) = state.workspaces.get_mut(workspace) {
                windows.insert(0, window);
            }
        }
        self.emit_window_event(HostEvent::TrackedWindowsChanged);
        id
    }

    /// Opens a window shown on every workspace.
    pub fn add_sticky_window(&self, app_id: Option<&str>) -> WindowId {
        let window = self.new_window(app_id, true);
        let id = window.id;
        self.state.lock().sticky.push(window);
        self.emit_window_event(HostEvent::TrackedWindowsChanged);
        id
    }

    pub fn close_window(&self, window: WindowId) {
        {
            let mut state = self.state.lock();
            for windows in state.workspaces.iter_mut() {
                windows.retain(|w| w.id != window);
            }
            state.sticky.retain(|w| w.id != window);
            if state.focused == Some(window) {
                state.focused = None;
            }
        }
        self.emit_window_event(HostEvent::TrackedWindowsChanged);
    }

    pub fn set_focused_window(&self, window: Option<WindowId>) {
        self.state.lock().focused = window;
    }

    /// Switches workspaces the way a user would outside the bar. Records nothing.
    pub fn switch_to(&self, index: usize) {
        let changed = {
            let mut state = self.state.lock();
            if index < state.workspaces.len() && index != state.active {
                state.active = index;
                true
            } else {
                false
            }
        };
        if changed {
            self.emit_workspace_event(HostEvent::ActiveWorkspaceChanged);
        }
    }

    pub fn set_overview_visible(&self, visible: bool) {
        self.state.lock().overview_visible = visible;
    }

    pub fn set_session_locked(&self, locked: bool) {
        self.state.lock().session_locked = locked;
    }

    pub fn overview_visible(&self) -> bool {
        self.state.lock().overview_visible
    }

    pub fn activities_visible(&self) -> bool {
        self.state.lock().activities_visible
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.state.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Number of live event subscriptions across all host services.
    pub fn handler_count(&self) -> usize {
        self.workspace_handlers.entries.lock().len() + self.window_handlers.entries.lock().len()
    }

    /// Workspace holding `window`, if it is not sticky.
    pub fn workspace_of(&self, window: WindowId) -> Option<usize> {
        self.state
            .lock()
            .workspaces
            .iter()
            .position(|windows| windows.iter().any(|w| w.id == window))
    }

    fn record(&self, call: HostCall) {
        self.state.lock().calls.push(call);
    }

    fn connect(&self, handlers: &Arc<Handlers>, handler: HostEventHandler) -> Disposer {
        let id = self.next_handler_id.fetch_add(1, Ordering::Relaxed);
        handlers.entries.lock().push((id, handler));
        let weak: Weak<Handlers> = Arc::downgrade(handlers);
        Disposer::new(move || {
            if let Some(handlers) = weak.upgrade() {
                handlers.entries.lock().retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    fn activate(&self, index: usize, focus: Option<WindowId>) {
        let changed = {
            let mut state = self.state.lock();
            if index >= state.workspaces.len() {
                return;
            }
            if focus.is_some() {
                state.focused = focus;
            }
            let changed = state.active != index;
            state.active = index;
            changed
        };
        if changed {
            self.emit_workspace_event(HostEvent::ActiveWorkspaceChanged);
        }
    }
}

impl WorkspaceManager for FakeHost {
    fn workspace_count(&self) -> usize {
        self.state.lock().workspaces.len()
    }

    fn active_workspace_index(&self) -> usize {
        self.state.lock().active
    }

    fn activate_workspace(&self, index: usize, _timestamp: u32) {
        self.record(HostCall::ActivateWorkspace(index));
        self.activate(index, None);
    }

    fn activate_workspace_with_focus(&self, index: usize, window: WindowId, _timestamp: u32) {
        self.record(HostCall::ActivateWorkspaceWithFocus(index, window));
        self.activate(index, Some(window));
    }

    fn append_workspace(&self, activate: bool, _timestamp: u32) {
        self.record(HostCall::AppendWorkspace { activate });
        let new_index = {
            let mut state = self.state.lock();
            state.workspaces.push(Vec::new());
            state.workspaces.len() - 1
        };
        self.emit_workspace_event(HostEvent::WorkspaceCountChanged);
        if activate {
            self.activate(new_index, None);
        }
    }

    fn remove_workspace(&self, index: usize, _timestamp: u32) {
        self.record(HostCall::RemoveWorkspace(index));
        let active_changed = {
            let mut state = self.state.lock();
            if index >= state.workspaces.len() || state.workspaces.len() == 1 {
                return;
            }
            let orphans = state.workspaces.remove(index);
            let neighbour = index.saturating_sub(1).min(state.workspaces.len() - 1);
            for window in orphans.into_iter().rev() {
                state.workspaces[neighbour].insert(0, window);
            }
            let previous_active = state.active;
            if state.active > index || state.active == state.workspaces.len() {
                state.active -= 1;
            }
            previous_active != state.active || previous_active == index
        };
        self.emit_workspace_event(HostEvent::WorkspaceRemoved(index));
        self.emit_workspace_event(HostEvent::WorkspaceCountChanged);
        if active_changed {
            self.emit_workspace_event(HostEvent::ActiveWorkspaceChanged);
        }
    }

    fn reorder_workspace(&self, index: usize, new_index: usize) {
        self.record(HostCall::ReorderWorkspace(index, new_index));
        {
            let mut state = self.state.lock();
            let len = state.workspaces.len();
            if index >= len || index == new_index {
                return;
            }
            let new_index = new_index.min(len - 1);
            let moved = state.workspaces.remove(index);
            state.workspaces.insert(new_index, moved);
            let active = state.active;
            state.active = if active == index {
                new_index
            } else if index < active && active <= new_index {
                active - 1
            } else if new_index <= active && active < index {
                active + 1
            } else {
                active
            };
        }
        self.emit_workspace_event(HostEvent::Restacked);
    }

    fn connect_events(&self, handler: HostEventHandler) -> Disposer {
        self.connect(&self.workspace_handlers, handler)
    }
}

impl WindowTracker for FakeHost {
    fn windows_on_workspace(&self, index: usize) -> Vec<WindowInfo> {
        let state = self.state.lock();
        match state.workspaces.get(index) {
            Some(windows) => windows.iter().chain(state.sticky.iter()).cloned().collect(),
            None => Vec::new(),
        }
    }

    fn focused_window(&self) -> Option<WindowInfo> {
        let state = self.state.lock();
        let focused = state.focused?;
        state
            .workspaces
            .iter()
            .flatten()
            .chain(state.sticky.iter())
            .find(|w| w.id == focused)
            .cloned()
    }

    fn move_window_to_workspace(&self, window: WindowId, index: usize) {
        self.record(HostCall::MoveWindow(window, index));
        {
            let mut state = self.state.lock();
            if index >= state.workspaces.len() {
                return;
            }
            let mut moved = None;
            for windows in state.workspaces.iter_mut() {
                if let Some(pos) = windows.iter().position(|w| w.id == window) {
                    moved = Some(windows.remove(pos));
                }
            }
            match moved {
                Some(info) => state.workspaces[index].insert(0, info),
                None => return,
            }
        }
        self.emit_workspace_event(HostEvent::Restacked);
    }

    fn connect_events(&self, handler: HostEventHandler) -> Disposer {
        self.connect(&self.window_handlers, handler)
    }
}

impl Shell for FakeHost {
    fn current_time(&self) -> u32 {
        let mut state = self.state.lock();
        state.time += 1;
        state.time
    }

    fn is_overview_visible(&self) -> bool {
        self.state.lock().overview_visible
    }

    fn show_overview(&self) {
        let mut state = self.state.lock();
        state.calls.push(HostCall::ShowOverview);
        state.overview_visible = true;
    }

    fn toggle_overview(&self) {
        let mut state = self.state.lock();
        state.calls.push(HostCall::ToggleOverview);
        state.overview_visible = !state.overview_visible;
    }

    fn set_activities_visible(&self, visible: bool) {
        let mut state = self.state.lock();
        state.calls.push(HostCall::SetActivitiesVisible(visible));
        state.activities_visible = visible;
    }

    fn is_session_locked(&self) -> bool {
        self.state.lock().session_locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_events(host: &Arc<FakeHost>) -> (Arc<Mutex<Vec<HostEvent>>>, Disposer, Disposer) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let handler: HostEventHandler = {
            let events = events.clone();
            Arc::new(move |event| events.lock().push(event))
        };
        let a = WorkspaceManager::connect_events(host.as_ref(), handler.clone());
        let b = WindowTracker::connect_events(host.as_ref(), handler);
        (events, a, b)
    }

    #[test]
    fn test_remove_emits_removed_then_count_changed() {
        let host = FakeHost::new(3);
        let (events, _a, _b) = record_events(&host);

        host.remove_workspace(1, 0);

        assert_eq!(
            *events.lock(),
            vec![HostEvent::WorkspaceRemoved(1), HostEvent::WorkspaceCountChanged]
        );
        assert_eq!(host.workspace_count(), 2);
    }

    #[test]
    fn test_removing_active_workspace_moves_focus_left() {
        let host = FakeHost::new(3);
        host.switch_to(2);
        let (events, _a, _b) = record_events(&host);

        host.remove_workspace(2, 0);

        assert_eq!(host.active_workspace_index(), 1);
        assert_eq!(events.lock().last(), Some(&HostEvent::ActiveWorkspaceChanged));
    }

    #[test]
    fn test_reorder_tracks_active_workspace() {
        let host = FakeHost::new(4);
        host.switch_to(1);
        host.reorder_workspace(0, 3);
        assert_eq!(host.active_workspace_index(), 0);
        host.reorder_workspace(0, 2);
        assert_eq!(host.active_workspace_index(), 2);
    }

    #[test]
    fn test_windows_include_sticky_ones() {
        let host = FakeHost::new(2);
        let own = host.add_window(0, Some("editor"));
        host.add_sticky_window(Some("clock"));

        let windows = host.windows_on_workspace(0);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].id, own);
        assert_eq!(host.services().own_windows_on_workspace(0).len(), 1);
        assert_eq!(host.services().own_windows_on_workspace(1).len(), 0);
    }

    #[test]
    fn test_disposer_disconnects() {
        let host = FakeHost::new(1);
        let (events, a, b) = record_events(&host);
        assert_eq!(host.handler_count(), 2);
        a.dispose();
        b.dispose();
        host.add_window(0, None);
        assert!(events.lock().is_empty());
        assert_eq!(host.handler_count(), 0);
    }
}
