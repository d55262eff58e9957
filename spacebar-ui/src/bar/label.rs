use crate::widget::{WorkspaceBoxSpec, BOX_STYLE_CLASS, LABEL_STYLE_CLASS};
use spacebar_domain::{WorkspaceSlot, WorkspacesSnapshot};

/// Label text and style classes of the box for `slot`.
pub fn box_spec(snapshot: &WorkspacesSnapshot, slot: &WorkspaceSlot) -> WorkspaceBoxSpec {
    let activity = if slot.index == snapshot.current_index { "active" } else { "inactive" };
    let occupancy = if slot.has_windows { "nonempty" } else { "empty" };
    WorkspaceBoxSpec {
        workspace_index: slot.index,
        style_class: BOX_STYLE_CLASS,
        label: snapshot.display_name(slot),
        label_style_classes: vec![LABEL_STYLE_CLASS, activity, occupancy],
    }
}
