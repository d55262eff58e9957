use std::sync::Arc;
use tracing::debug;

use super::{DragMotionResult, DragSource, DropTarget};
use spacebar_domain::workspaces::WindowTracker;

/// Drop target of a single workspace box: windows dropped on it move to its workspace.
pub struct WorkspaceBoxDropTarget {
    workspace_index: usize,
    windows: Arc<dyn WindowTracker>,
}

impl WorkspaceBoxDropTarget {
    pub fn new(workspace_index: usize, windows: Arc<dyn WindowTracker>) -> Self {
        Self { workspace_index, windows }
    }

    pub fn workspace_index(&self) -> usize {
        self.workspace_index
    }
}

impl DropTarget for WorkspaceBoxDropTarget {
    fn accept_drop(&self, source: &DragSource) -> bool {
        match source {
            DragSource::Window { window_id } => {
                debug!(window = window_id.0, workspace = self.workspace_index, "Moving dropped window");
                self.windows.move_window_to_workspace(*window_id, self.workspace_index);
                true
            }
            _ => false,
        }
    }

    fn drag_over(&self, source: &DragSource) -> DragMotionResult {
        match source {
            DragSource::Window { .. } => DragMotionResult::MoveDrop,
            _ => DragMotionResult::Continue,
        }
    }
}
