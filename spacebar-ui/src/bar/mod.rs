//! The workspace bar.
//!
//! [`WorkspaceBarController`] redraws every box whenever the workspace engine
//! delivers an update and turns pointer input on the boxes into workspace
//! operations.

mod label;

pub use label::box_spec;

use parking_lot::Mutex;
use spacebar_core::BarConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, trace};

use crate::click::{ClickRecognizer, MouseButton};
use crate::drag::{DragReorderController, DropTarget, WorkspaceBoxDropTarget};
use crate::widget::{BarWidget, EventPropagation, WorkspaceBoxWidget};
use spacebar_domain::{ActivateOptions, Workspaces};

struct BoxEntry {
    workspace_index: usize,
    widget: Arc<dyn WorkspaceBoxWidget>,
    click: ClickRecognizer,
    drop_target: Arc<WorkspaceBoxDropTarget>,
}

pub struct WorkspaceBarController {
    workspaces: Arc<Workspaces>,
    bar: Arc<dyn BarWidget>,
    drag: Arc<DragReorderController>,
    max_click_time_delta_ms: u32,
    boxes: Mutex<Vec<BoxEntry>>,
    destroyed: AtomicBool,
}

impl WorkspaceBarController {
    pub fn new(workspaces: Arc<Workspaces>, bar: Arc<dyn BarWidget>, config: &BarConfig) -> Arc<Self> {
        Arc::new_cyclic(|weak: &Weak<Self>| {
            let weak = weak.clone();
            let rebuild = Arc::new(move || {
                if let Some(this) = weak.upgrade() {
                    this.rebuild();
                }
            });
            Self {
                drag: Arc::new(DragReorderController::new(workspaces.clone(), bar.clone(), rebuild)),
                workspaces,
                bar,
                max_click_time_delta_ms: config.max_click_time_delta_ms,
                boxes: Mutex::new(Vec::new()),
                destroyed: AtomicBool::new(false),
            }
        })
    }

    /// Draws the bar and redraws it on every engine update.
    pub fn init(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        self.workspaces.on_update(move || {
            if let Some(this) = weak.upgrade() {
                this.rebuild();
            }
        });
        self.rebuild();
    }

    /// Replaces all boxes with one per visible enabled workspace, in index order.
    pub fn rebuild(&self) {
        if self.destroyed.load(Ordering::SeqCst) {
            return;
        }
        let snapshot = self.workspaces.snapshot();
        self.bar.clear();

        let windows = self.workspaces.host().windows.clone();
        let entries: Vec<BoxEntry> = snapshot
            .visible_workspaces()
            .map(|slot| {
                let widget = self.bar.add_box(&box_spec(&snapshot, slot));
                BoxEntry {
                    workspace_index: slot.index,
                    widget,
                    click: ClickRecognizer::new(self.max_click_time_delta_ms),
                    drop_target: Arc::new(WorkspaceBoxDropTarget::new(slot.index, windows.clone())),
                }
            })
            .collect();
        trace!(boxes = entries.len(), "Workspace bar rebuilt");

        self.drag.set_boxes(
            entries
                .iter()
                .map(|entry| (entry.workspace_index, entry.widget.clone()))
                .collect(),
        );
        *self.boxes.lock() = entries;
    }

    /// Workspace indices of the boxes, left to right.
    pub fn displayed_workspaces(&self) -> Vec<usize> {
        self.boxes.lock().iter().map(|entry| entry.workspace_index).collect()
    }

    pub fn on_button_press(&self, workspace_index: usize, button: MouseButton, time_ms: u32) -> EventPropagation {
        match button {
            MouseButton::Primary => {
                if let Some(entry) = self.boxes.lock().iter_mut().find(|e| e.workspace_index == workspace_index) {
                    entry.click.press(time_ms);
                }
            }
            MouseButton::Middle => self.workspaces.remove_workspace(workspace_index),
            MouseButton::Secondary => self.bar.toggle_menu(),
            MouseButton::Other(_) => {}
        }
        EventPropagation::Propagate
    }

    /// Activates the workspace when the release completes a click on the same box.
    pub fn on_button_release(&self, workspace_index: usize, button: MouseButton, time_ms: u32) -> EventPropagation {
        if button == MouseButton::Primary {
            let clicked = self
                .boxes
                .lock()
                .iter_mut()
                .find(|e| e.workspace_index == workspace_index)
                .map_or(false, |entry| entry.click.release(time_ms));
            if clicked {
                self.workspaces.activate(workspace_index, ActivateOptions::default());
            }
        }
        EventPropagation::Propagate
    }

    /// The drop target of the bar itself.
    pub fn drag(&self) -> &Arc<DragReorderController> {
        &self.drag
    }

    /// The drop target of the box showing `workspace_index`.
    pub fn drop_target_for(&self, workspace_index: usize) -> Option<Arc<dyn DropTarget>> {
        self.boxes
            .lock()
            .iter()
            .find(|entry| entry.workspace_index == workspace_index)
            .map(|entry| entry.drop_target.clone() as Arc<dyn DropTarget>)
    }

    /// Removes all boxes and stops redrawing. Idempotent.
    pub fn destroy(&self) {
        if self.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.drag.destroy();
        self.boxes.lock().clear();
        self.bar.clear();
        debug!("Workspace bar destroyed");
    }
}
