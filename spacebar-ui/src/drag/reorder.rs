//! Reordering workspaces by dragging their boxes along the bar.
//!
//! While a box is dragged, the other boxes are described by a frozen list of
//! positions taken at drag start: their horizontal centers, with every box
//! right of the dragged one shifted left by the dragged box's width as if it
//! had already been lifted out. The insertion point is the first position
//! whose center lies right of the dragged box's left edge, and an empty margin
//! next to the neighbouring box previews it.
//!
//! The preview is not drawn while the pointer hovers over the box's starting
//! place, until either the insertion point changes once or the bar's width
//! differs from the start of the drag.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, trace};

use super::{drop_index, DragMotionResult, DragSource, DropTarget};
use crate::widget::{BarWidget, Margin, WorkspaceBoxWidget, DRAGGING_STYLE_CLASS};
use spacebar_domain::Workspaces;

pub type RebuildCallback = Arc<dyn Fn() + Send + Sync + 'static>;

/// Which side of its neighbour a dragged box would land on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropSide {
    Before,
    After,
}

/// Where a dropped box would end up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropPosition {
    /// Index the dragged workspace is moved to.
    pub index: usize,
    /// Workspace index of the box the placeholder is drawn next to.
    pub neighbour: usize,
    pub side: DropSide,
    /// Width of the placeholder.
    pub width: f32,
}

impl DropPosition {
    fn same_place(a: Option<&DropPosition>, b: Option<&DropPosition>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => a.index == b.index && a.side == b.side,
            (None, None) => true,
            _ => false,
        }
    }
}

#[derive(Clone)]
struct BarBox {
    workspace_index: usize,
    widget: Arc<dyn WorkspaceBoxWidget>,
}

#[derive(Debug, Clone, Copy)]
struct BoxPosition {
    drop_index: usize,
    center: f32,
    workspace_index: usize,
}

struct DragSession {
    dragged_index: usize,
    dragged: Arc<dyn WorkspaceBoxWidget>,
    positions: Vec<BoxPosition>,
    initial: Option<DropPosition>,
    bar_width_at_start: f32,
    has_left_initial: bool,
    bar_offset: f32,
}

/// Drop target of the whole bar, handling drags of its own boxes.
pub struct DragReorderController {
    workspaces: Arc<Workspaces>,
    bar: Arc<dyn BarWidget>,
    rebuild: RebuildCallback,
    boxes: Mutex<Vec<BarBox>>,
    session: Mutex<Option<DragSession>>,
}

impl DragReorderController {
    pub fn new(workspaces: Arc<Workspaces>, bar: Arc<dyn BarWidget>, rebuild: RebuildCallback) -> Self {
        Self {
            workspaces,
            bar,
            rebuild,
            boxes: Mutex::new(Vec::new()),
            session: Mutex::new(None),
        }
    }

    /// Replaces the boxes currently in the bar, in display order.
    pub fn set_boxes(&self, boxes: Vec<(usize, Arc<dyn WorkspaceBoxWidget>)>) {
        *self.boxes.lock() = boxes
            .into_iter()
            .map(|(workspace_index, widget)| BarBox { workspace_index, widget })
            .collect();
    }

    pub fn is_dragging(&self) -> bool {
        self.session.lock().is_some()
    }

    /// The insertion point the current drag started with.
    pub fn initial_drop_position(&self) -> Option<DropPosition> {
        self.session.lock().as_ref().and_then(|session| session.initial)
    }

    pub fn on_drag_begin(&self, workspace_index: usize) {
        let boxes = self.boxes.lock().clone();
        let Some(box_index) = boxes.iter().position(|b| b.workspace_index == workspace_index) else {
            trace!(workspace_index, "Drag of a box not in the bar");
            return;
        };
        let dragged = boxes[box_index].widget.clone();
        dragged.add_style_class(DRAGGING_STYLE_CLASS);

        let dragged_width = dragged.width();
        let positions = boxes
            .iter()
            .filter(|b| b.workspace_index != workspace_index)
            .enumerate()
            .map(|(i, b)| {
                let mut center = b.widget.x() + b.widget.width() / 2.0;
                if i >= box_index {
                    center -= dragged_width;
                }
                BoxPosition {
                    drop_index: drop_index(workspace_index, b.workspace_index),
                    center,
                    workspace_index: b.workspace_index,
                }
            })
            .collect();

        let bar_width_at_start = self.bar.width();
        let bar_offset = self.bar.offset_x();
        debug!(workspace_index, "Drag started");
        *self.session.lock() = Some(DragSession {
            dragged_index: workspace_index,
            dragged,
            positions,
            initial: None,
            bar_width_at_start,
            has_left_initial: false,
            bar_offset,
        });

        let initial = self.drop_position();
        if let Some(session) = self.session.lock().as_mut() {
            session.initial = initial;
        }
        self.update_placeholder(initial);
    }

    /// Called for every pointer motion while a drag is in progress.
    pub fn on_drag_motion(&self) {
        let initial = self.initial_drop_position();
        self.update_placeholder(initial);
    }

    pub fn on_drag_cancelled(&self) {
        let initial = self.initial_drop_position();
        self.update_placeholder(initial);
        self.finish_drag();
    }

    /// Called once the toolkit has released the dragged box.
    pub fn on_drag_end(&self) {
        (self.rebuild)();
    }

    /// Abandons a running drag and forgets the boxes.
    pub fn destroy(&self) {
        self.finish_drag();
        self.boxes.lock().clear();
    }

    /// Where the dragged box would be dropped right now.
    pub fn drop_position(&self) -> Option<DropPosition> {
        let (dragged, positions, bar_offset) = {
            let session = self.session.lock();
            let session = session.as_ref()?;
            (session.dragged.clone(), session.positions.clone(), session.bar_offset)
        };
        let x = dragged.x();
        let width = dragged.width();
        if let Some(position) = positions.iter().find(|p| x < p.center + bar_offset) {
            return Some(DropPosition {
                index: position.drop_index,
                neighbour: position.workspace_index,
                side: DropSide::Before,
                width,
            });
        }
        let last = positions.last()?;
        Some(DropPosition {
            index: self.workspaces.snapshot().last_visible_workspace,
            neighbour: last.workspace_index,
            side: DropSide::After,
            width,
        })
    }

    fn update_placeholder(&self, position: Option<DropPosition>) {
        let bar_width = self.bar.width();
        {
            let mut session = self.session.lock();
            let Some(session) = session.as_mut() else {
                return;
            };
            if DropPosition::same_place(position.as_ref(), session.initial.as_ref()) {
                if !session.has_left_initial && session.bar_width_at_start != bar_width {
                    session.has_left_initial = true;
                }
                if !session.has_left_initial {
                    return;
                }
            } else {
                session.has_left_initial = true;
            }
        }

        let boxes = self.boxes.lock().clone();
        for bar_box in boxes {
            let margin = position.filter(|p| p.neighbour == bar_box.workspace_index).map(|p| match p.side {
                DropSide::Before => Margin::Leading(p.width),
                DropSide::After => Margin::Trailing(p.width),
            });
            bar_box.widget.set_margin(margin);
        }
    }

    fn finish_drag(&self) {
        let session = self.session.lock().take();
        if let Some(session) = session {
            session.dragged.remove_style_class(DRAGGING_STYLE_CLASS);
            debug!(workspace_index = session.dragged_index, "Drag finished");
        }
    }
}

impl DropTarget for DragReorderController {
    fn accept_drop(&self, source: &DragSource) -> bool {
        if !matches!(source, DragSource::WorkspaceBox { .. }) {
            return false;
        }
        let Some(dragged_index) = self.session.lock().as_ref().map(|s| s.dragged_index) else {
            return false;
        };
        let accepted = match self.drop_position() {
            Some(position) => {
                if position.index != dragged_index {
                    self.workspaces.reorder_workspace(dragged_index, position.index);
                }
                (self.rebuild)();
                true
            }
            None => false,
        };
        self.finish_drag();
        accepted
    }

    fn drag_over(&self, source: &DragSource) -> DragMotionResult {
        if matches!(source, DragSource::WorkspaceBox { .. }) {
            let position = self.drop_position();
            self.update_placeholder(position);
        }
        DragMotionResult::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::WorkspaceBoxSpec;
    use spacebar_core::BarConfig;
    use spacebar_domain::testing::{FakeHost, HostCall};
    use spacebar_domain::{Observable, Settings, SettingsStore};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeBox {
        x: Mutex<f32>,
        width: f32,
        margin: Mutex<Option<Margin>>,
        classes: Mutex<Vec<String>>,
    }

    impl FakeBox {
        fn new(x: f32) -> Arc<Self> {
            Arc::new(Self {
                x: Mutex::new(x),
                width: 10.0,
                margin: Mutex::new(None),
                classes: Mutex::new(Vec::new()),
            })
        }

        fn move_to(&self, x: f32) {
            *self.x.lock() = x;
        }

        fn margin(&self) -> Option<Margin> {
            *self.margin.lock()
        }
    }

    impl WorkspaceBoxWidget for FakeBox {
        fn x(&self) -> f32 {
            *self.x.lock()
        }
        fn width(&self) -> f32 {
            self.width
        }
        fn set_margin(&self, margin: Option<Margin>) {
            *self.margin.lock() = margin;
        }
        fn add_style_class(&self, class: &str) {
            self.classes.lock().push(class.to_string());
        }
        fn remove_style_class(&self, class: &str) {
            self.classes.lock().retain(|c| c != class);
        }
    }

    struct FakeBar {
        width: Mutex<f32>,
    }

    impl BarWidget for FakeBar {
        fn clear(&self) {}
        fn add_box(&self, _spec: &WorkspaceBoxSpec) -> Arc<dyn WorkspaceBoxWidget> {
            FakeBox::new(0.0)
        }
        fn width(&self) -> f32 {
            *self.width.lock()
        }
        fn offset_x(&self) -> f32 {
            100.0
        }
        fn toggle_menu(&self) {}
    }

    struct Fixture {
        host: Arc<FakeHost>,
        bar: Arc<FakeBar>,
        boxes: Vec<Arc<FakeBox>>,
        rebuilds: Arc<AtomicUsize>,
        controller: DragReorderController,
    }

    /// `count` workspaces, all shown, with 10px boxes laid out from bar-local x = 0.
    fn fixture(count: usize) -> Fixture {
        let store: Arc<dyn SettingsStore> = Arc::new(Settings::default_store());
        let settings = Settings::bind(store).unwrap();
        settings.dynamic_workspaces.set_value(false);
        settings.show_empty_workspaces.set_value(true);
        let host = FakeHost::new(count);
        let workspaces = Workspaces::new(settings, host.services(), &BarConfig::default());
        workspaces.init();

        let bar = Arc::new(FakeBar { width: Mutex::new(count as f32 * 10.0) });
        let rebuilds = Arc::new(AtomicUsize::new(0));
        let rebuilds_clone = rebuilds.clone();
        let controller = DragReorderController::new(
            workspaces,
            bar.clone(),
            Arc::new(move || {
                rebuilds_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );
        let boxes: Vec<Arc<FakeBox>> = (0..count).map(|i| FakeBox::new(i as f32 * 10.0)).collect();
        controller.set_boxes(
            boxes
                .iter()
                .enumerate()
                .map(|(i, b)| (i, b.clone() as Arc<dyn WorkspaceBoxWidget>))
                .collect(),
        );
        host.clear_calls();
        Fixture { host, bar, boxes, rebuilds, controller }
    }

    /// Starts dragging box `index`, which the toolkit reports in stage coordinates.
    fn begin(f: &Fixture, index: usize) {
        f.boxes[index].move_to(100.0 + index as f32 * 10.0);
        f.controller.on_drag_begin(index);
    }

    const SOURCE: DragSource = DragSource::WorkspaceBox { workspace_index: 1 };

    #[tokio::test]
    async fn test_drag_begin_computes_initial_position_without_placeholder() {
        let f = fixture(4);
        begin(&f, 1);

        assert!(f.controller.is_dragging());
        assert!(f.boxes[1].classes.lock().contains(&DRAGGING_STYLE_CLASS.to_string()));
        let initial = f.controller.initial_drop_position().unwrap();
        assert_eq!((initial.index, initial.neighbour, initial.side), (1, 2, DropSide::Before));
        assert!(f.boxes.iter().all(|b| b.margin().is_none()));
    }

    #[tokio::test]
    async fn test_drag_past_last_box_drops_after_it() {
        let f = fixture(4);
        begin(&f, 1);
        f.boxes[1].move_to(130.0);

        assert_eq!(f.controller.drag_over(&SOURCE), DragMotionResult::Continue);
        assert_eq!(f.boxes[3].margin(), Some(Margin::Trailing(10.0)));
        assert_eq!(f.boxes[2].margin(), None);

        assert!(f.controller.accept_drop(&SOURCE));
        assert_eq!(f.host.calls(), vec![HostCall::ReorderWorkspace(1, 3)]);
        assert_eq!(f.rebuilds.load(Ordering::SeqCst), 1);
        assert!(!f.controller.is_dragging());
        assert!(f.boxes[1].classes.lock().is_empty());
    }

    #[tokio::test]
    async fn test_drag_to_front() {
        let f = fixture(4);
        begin(&f, 2);
        f.boxes[2].move_to(101.0);
        f.controller.drag_over(&DragSource::WorkspaceBox { workspace_index: 2 });

        assert_eq!(f.boxes[0].margin(), Some(Margin::Leading(10.0)));
        assert!(f.controller.accept_drop(&DragSource::WorkspaceBox { workspace_index: 2 }));
        assert_eq!(f.host.calls(), vec![HostCall::ReorderWorkspace(2, 0)]);
    }

    #[tokio::test]
    async fn test_drop_at_origin_only_rebuilds() {
        let f = fixture(3);
        begin(&f, 1);

        assert!(f.controller.accept_drop(&SOURCE));
        assert!(f.host.calls().is_empty());
        assert_eq!(f.rebuilds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_motion_restores_initial_placeholder_once_left() {
        let f = fixture(4);
        begin(&f, 1);
        f.controller.on_drag_motion();
        assert!(f.boxes.iter().all(|b| b.margin().is_none()));

        f.boxes[1].move_to(130.0);
        f.controller.drag_over(&SOURCE);
        f.controller.on_drag_motion();

        assert_eq!(f.boxes[2].margin(), Some(Margin::Leading(10.0)));
        assert_eq!(f.boxes[3].margin(), None);
    }

    #[tokio::test]
    async fn test_bar_width_change_draws_initial_placeholder() {
        let f = fixture(4);
        begin(&f, 1);
        *f.bar.width.lock() = 30.0;
        f.controller.on_drag_motion();

        assert_eq!(f.boxes[2].margin(), Some(Margin::Leading(10.0)));
    }

    #[tokio::test]
    async fn test_cancel_restores_and_finishes() {
        let f = fixture(4);
        begin(&f, 1);
        f.boxes[1].move_to(130.0);
        f.controller.drag_over(&SOURCE);
        f.controller.on_drag_cancelled();

        assert_eq!(f.boxes[2].margin(), Some(Margin::Leading(10.0)));
        assert!(!f.controller.is_dragging());
        assert!(f.host.calls().is_empty());

        f.controller.on_drag_end();
        assert_eq!(f.rebuilds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_single_box_has_no_drop_position() {
        let f = fixture(1);
        begin(&f, 0);

        assert_eq!(f.controller.drop_position(), None);
        assert!(!f.controller.accept_drop(&DragSource::WorkspaceBox { workspace_index: 0 }));
        assert_eq!(f.rebuilds.load(Ordering::SeqCst), 0);
        assert!(!f.controller.is_dragging());
    }

    #[tokio::test]
    async fn test_foreign_sources_are_ignored() {
        let f = fixture(3);
        begin(&f, 1);

        assert!(!f.controller.accept_drop(&DragSource::Other));
        assert!(f.controller.is_dragging());
        assert_eq!(f.controller.drag_over(&DragSource::Other), DragMotionResult::Continue);
    }
}
