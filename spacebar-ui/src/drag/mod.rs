//! Drag-and-drop on the workspace bar.
//!
//! Two drop targets exist: the bar itself, which reorders workspaces when a
//! workspace box is dropped on it ([`DragReorderController`]), and each
//! workspace box, which moves dropped windows onto its workspace
//! ([`WorkspaceBoxDropTarget`]).

mod reorder;
mod window_drop;

pub use reorder::{DragReorderController, DropPosition, DropSide, RebuildCallback};
pub use window_drop::WorkspaceBoxDropTarget;

use spacebar_domain::WindowId;

/// What is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSource {
    /// A box of the workspace bar.
    WorkspaceBox { workspace_index: usize },
    /// A window preview from the overview.
    Window { window_id: WindowId },
    Other,
}

/// Answer of a drop target while something is dragged over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMotionResult {
    /// Not handled here; the toolkit keeps looking.
    Continue,
    /// Dropping here moves the source.
    MoveDrop,
}

pub trait DropTarget: Send + Sync {
    /// Handles a drop. Returns whether the source was taken.
    fn accept_drop(&self, source: &DragSource) -> bool;

    fn drag_over(&self, source: &DragSource) -> DragMotionResult;
}

/// The index workspace `target` ends up at when `origin` is moved in front of it.
///
/// Moving a workspace to the right shifts everything between the old and the
/// new place one step to the left.
pub fn drop_index(origin: usize, target: usize) -> usize {
    if origin < target {
        target - 1
    } else {
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_index_to_the_right() {
        assert_eq!(drop_index(2, 4), 3);
        assert_eq!(drop_index(0, 1), 0);
    }

    #[test]
    fn test_drop_index_to_the_left() {
        assert_eq!(drop_index(2, 0), 0);
        assert_eq!(drop_index(3, 1), 1);
    }
}
