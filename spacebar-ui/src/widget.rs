//! Toolkit-facing widget interfaces.
//!
//! The bar, its workspace boxes, the companion menu and scrollable panel areas
//! are owned by the shell toolkit. Spacebar drives them only through these
//! traits; the toolkit adapter forwards pointer and drag events back into the
//! controllers.

use spacebar_core::Disposer;
use std::sync::Arc;

/// Style class of every workspace label.
pub const LABEL_STYLE_CLASS: &str = "space-bar-workspace-label";
/// Style class of every workspace box.
pub const BOX_STYLE_CLASS: &str = "workspace-box";
/// Added to a box while it is being dragged.
pub const DRAGGING_STYLE_CLASS: &str = "dragging";

/// Empty space rendered next to a box to preview a drop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Margin {
    Leading(f32),
    Trailing(f32),
}

/// What the bar needs to create one workspace box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceBoxSpec {
    pub workspace_index: usize,
    pub style_class: &'static str,
    pub label: String,
    pub label_style_classes: Vec<&'static str>,
}

/// One box in the bar.
pub trait WorkspaceBoxWidget: Send + Sync {
    /// Left edge. Bar-local while resting, stage coordinates while dragged.
    fn x(&self) -> f32;

    fn width(&self) -> f32;

    fn set_margin(&self, margin: Option<Margin>);

    fn add_style_class(&self, class: &str);

    fn remove_style_class(&self, class: &str);
}

/// The horizontal container of workspace boxes.
pub trait BarWidget: Send + Sync {
    /// Destroys every box.
    fn clear(&self);

    /// Appends a box at the end of the bar.
    fn add_box(&self, spec: &WorkspaceBoxSpec) -> Arc<dyn WorkspaceBoxWidget>;

    fn width(&self) -> f32;

    /// Horizontal offset of the bar in stage coordinates.
    fn offset_x(&self) -> f32;

    fn toggle_menu(&self);
}

/// An entry of the companion menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Heading(String),
    Action { label: String, action: MenuAction },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ActivateWorkspace(usize),
    AddWorkspace,
    RemoveCurrentWorkspace,
    OpenPreferences,
}

/// The companion menu of the bar.
pub trait MenuView: Send + Sync {
    fn open(&self);

    fn close(&self);

    /// Text of the rename entry.
    fn entry_text(&self) -> String;

    /// Replaces the entry text and selects it.
    fn set_entry_text(&self, text: &str);

    fn set_hidden_workspaces(&self, items: Vec<MenuItem>);

    fn set_manage_workspaces(&self, items: Vec<MenuItem>);

    fn open_preferences(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
    Smooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollEvent {
    pub direction: ScrollDirection,
    /// The event started on a status-area indicator with scroll handling of its own.
    pub from_status_area: bool,
}

/// Whether an input event continues to other handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventPropagation {
    Propagate,
    Stop,
}

pub type ScrollHandlerFn = Arc<dyn Fn(ScrollEvent) -> EventPropagation + Send + Sync + 'static>;

/// A widget emitting scroll events.
pub trait ScrollSource: Send + Sync {
    fn connect_scroll(&self, handler: ScrollHandlerFn) -> Disposer;
}
