//! Switching workspaces with the scroll wheel.

use parking_lot::Mutex;
use spacebar_core::{Disposer, DisposerList};
use std::sync::{Arc, Weak};
use tracing::debug;

use crate::widget::{EventPropagation, ScrollDirection, ScrollEvent, ScrollSource};
use spacebar_domain::{Observable, ScrollWheelMode, Workspaces, WorkspacesSnapshot};

/// The nearest visible enabled workspace from `index` in direction `step`.
pub fn find_visible_workspace(snapshot: &WorkspacesSnapshot, index: usize, step: isize) -> Option<usize> {
    let mut index = index;
    loop {
        index = index.checked_add_signed(step)?;
        if index >= snapshot.number_of_enabled_workspaces {
            return None;
        }
        if snapshot.get(index).map_or(false, |slot| slot.is_visible) {
            return Some(index);
        }
    }
}

/// Connects scroll handling to the panel or the workspace bar, as the
/// `scroll-wheel` setting says.
pub struct ScrollHandler {
    workspaces: Arc<Workspaces>,
    panel: Arc<dyn ScrollSource>,
    bar: Arc<dyn ScrollSource>,
    connection: Mutex<Option<Disposer>>,
    subscriptions: DisposerList,
}

impl ScrollHandler {
    pub fn new(workspaces: Arc<Workspaces>, panel: Arc<dyn ScrollSource>, bar: Arc<dyn ScrollSource>) -> Arc<Self> {
        Arc::new(Self {
            workspaces,
            panel,
            bar,
            connection: Mutex::new(None),
            subscriptions: DisposerList::new(),
        })
    }

    pub fn init(self: &Arc<Self>) {
        let weak: Weak<Self> = Arc::downgrade(self);
        self.subscriptions.push(self.workspaces.settings().scroll_wheel.subscribe(
            Arc::new(move |mode: &ScrollWheelMode| {
                if let Some(this) = weak.upgrade() {
                    this.connect(*mode);
                }
            }),
            true,
        ));
    }

    fn connect(self: &Arc<Self>, mode: ScrollWheelMode) {
        self.disconnect();
        let source = match mode {
            ScrollWheelMode::Panel => &self.panel,
            ScrollWheelMode::WorkspacesBar => &self.bar,
            ScrollWheelMode::Disabled => {
                debug!("Scroll wheel switching disabled");
                return;
            }
        };
        debug!(%mode, "Connecting scroll wheel");
        let weak = Arc::downgrade(self);
        let disposer = source.connect_scroll(Arc::new(move |event: ScrollEvent| match weak.upgrade() {
            Some(this) => this.handle_scroll(event),
            None => EventPropagation::Propagate,
        }));
        *self.connection.lock() = Some(disposer);
    }

    fn disconnect(&self) {
        let connection = self.connection.lock().take();
        if let Some(disposer) = connection {
            disposer.dispose();
        }
    }

    pub fn handle_scroll(&self, event: ScrollEvent) -> EventPropagation {
        if event.from_status_area {
            return EventPropagation::Propagate;
        }
        let step = match event.direction {
            ScrollDirection::Up => -1,
            ScrollDirection::Down => 1,
            _ => return EventPropagation::Propagate,
        };
        let host = self.workspaces.host();
        let current = host.workspaces.active_workspace_index();
        let snapshot = self.workspaces.snapshot();
        if let Some(index) = find_visible_workspace(&snapshot, current, step) {
            host.workspaces.activate_workspace(index, host.shell.current_time());
            self.workspaces.focus_most_recent_window_on_workspace(index);
        }
        EventPropagation::Stop
    }

    pub fn destroy(&self) {
        self.subscriptions.dispose_all();
        self.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::ScrollHandlerFn;
    use spacebar_core::BarConfig;
    use spacebar_domain::testing::{FakeHost, HostCall};
    use spacebar_domain::workspaces::SnapshotInputs;
    use spacebar_domain::{Settings, SettingsStore};

    #[derive(Default)]
    struct FakeSource {
        handler: Arc<Mutex<Option<ScrollHandlerFn>>>,
    }

    impl FakeSource {
        fn is_connected(&self) -> bool {
            self.handler.lock().is_some()
        }

        fn scroll(&self, direction: ScrollDirection) -> EventPropagation {
            let handler = self.handler.lock().clone().unwrap();
            handler(ScrollEvent { direction, from_status_area: false })
        }
    }

    impl ScrollSource for FakeSource {
        fn connect_scroll(&self, handler: ScrollHandlerFn) -> Disposer {
            *self.handler.lock() = Some(handler);
            let slot = self.handler.clone();
            Disposer::new(move || {
                slot.lock().take();
            })
        }
    }

    fn snapshot(count: usize, current: usize, with_windows: &[usize]) -> WorkspacesSnapshot {
        WorkspacesSnapshot::derive(
            &SnapshotInputs {
                enabled_count: count,
                current_index: current,
                dynamic_workspaces: false,
                show_empty_workspaces: false,
                names: Vec::new(),
            },
            |index| with_windows.contains(&index),
        )
    }

    #[test]
    fn test_find_visible_workspace_skips_hidden() {
        let snapshot = snapshot(5, 2, &[0, 4]);
        assert_eq!(find_visible_workspace(&snapshot, 2, 1), Some(4));
        assert_eq!(find_visible_workspace(&snapshot, 2, -1), Some(0));
        assert_eq!(find_visible_workspace(&snapshot, 4, 1), None);
        assert_eq!(find_visible_workspace(&snapshot, 0, -1), None);
    }

    fn setup(count: usize) -> (Arc<FakeHost>, Arc<Workspaces>, Arc<FakeSource>, Arc<FakeSource>, Arc<ScrollHandler>) {
        let store: Arc<dyn SettingsStore> = Arc::new(Settings::default_store());
        let settings = Settings::bind(store).unwrap();
        settings.dynamic_workspaces.set_value(false);
        settings.show_empty_workspaces.set_value(true);
        let host = FakeHost::new(count);
        let workspaces = Workspaces::new(settings, host.services(), &BarConfig::default());
        workspaces.init();
        let panel = Arc::new(FakeSource::default());
        let bar = Arc::new(FakeSource::default());
        let handler = ScrollHandler::new(workspaces.clone(), panel.clone(), bar.clone());
        handler.init();
        host.clear_calls();
        (host, workspaces, panel, bar, handler)
    }

    #[tokio::test]
    async fn test_setting_selects_scroll_source() {
        let (_host, workspaces, panel, bar, handler) = setup(3);
        assert!(panel.is_connected());
        assert!(!bar.is_connected());

        let setting = &workspaces.settings().scroll_wheel;
        setting.set_value(ScrollWheelMode::WorkspacesBar);
        assert!(!panel.is_connected());
        assert!(bar.is_connected());

        setting.set_value(ScrollWheelMode::Disabled);
        assert!(!bar.is_connected());

        setting.set_value(ScrollWheelMode::Panel);
        handler.destroy();
        assert!(!panel.is_connected());
    }

    #[tokio::test]
    async fn test_scroll_down_activates_next_workspace() {
        let (host, _workspaces, panel, _bar, _handler) = setup(3);
        let window = host.add_window(1, Some("editor"));

        assert_eq!(panel.scroll(ScrollDirection::Down), EventPropagation::Stop);
        assert_eq!(
            host.calls(),
            vec![HostCall::ActivateWorkspace(1), HostCall::ActivateWorkspaceWithFocus(1, window)]
        );
    }

    #[tokio::test]
    async fn test_scroll_past_the_edge_stops_without_switching() {
        let (host, _workspaces, panel, _bar, _handler) = setup(3);

        assert_eq!(panel.scroll(ScrollDirection::Up), EventPropagation::Stop);
        assert_eq!(panel.scroll(ScrollDirection::Left), EventPropagation::Propagate);
        assert!(host.calls().is_empty());
    }

    #[tokio::test]
    async fn test_status_area_scroll_propagates() {
        let (host, _workspaces, _panel, _bar, handler) = setup(3);
        let event = ScrollEvent { direction: ScrollDirection::Down, from_status_area: true };

        assert_eq!(handler.handle_scroll(event), EventPropagation::Propagate);
        assert!(host.calls().is_empty());
    }
}
