//! Workspace tracking: host interfaces, the derived snapshot, workspace names
//! and the [`Workspaces`] engine tying them together.

mod engine;
mod host;
pub mod names;
mod state;

pub use engine::{ActivateOptions, Workspaces};
pub use host::{
    HostEvent, HostEventHandler, HostServices, Shell, WindowId, WindowInfo, WindowTracker,
    WorkspaceManager,
};
pub use names::WorkspaceNameStore;
pub use state::{SnapshotInputs, UpdateReason, WorkspaceSlot, WorkspacesSnapshot};
