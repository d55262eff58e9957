//! The derived workspace snapshot.

use std::fmt;

/// Why a recomputation was triggered. `None` at the call sites means forced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateReason {
    ActiveWorkspaceChanged,
    NumberOfWorkspacesChanged,
    WorkspaceNamesChanged,
    WindowsChanged,
}

impl fmt::Display for UpdateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            UpdateReason::ActiveWorkspaceChanged => "active-workspace-changed",
            UpdateReason::NumberOfWorkspacesChanged => "number-of-workspaces-changed",
            UpdateReason::WorkspaceNamesChanged => "workspace-names-changed",
            UpdateReason::WindowsChanged => "windows-changed",
        };
        f.write_str(reason)
    }
}

/// One tracked workspace index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceSlot {
    pub index: usize,
    /// A real workspace backs this index. Disabled slots only keep their name aligned.
    pub is_enabled: bool,
    /// Whether the slot is shown in the bar.
    pub is_visible: bool,
    pub has_windows: bool,
    pub name: Option<String>,
}

impl WorkspaceSlot {
    /// Whether the slot has a non-empty stored name.
    pub fn has_name(&self) -> bool {
        self.name.as_deref().map_or(false, |name| !name.is_empty())
    }
}

/// Everything [`WorkspacesSnapshot::derive`] reads besides per-workspace windows.
#[derive(Debug, Clone, Default)]
pub struct SnapshotInputs {
    pub enabled_count: usize,
    pub current_index: usize,
    pub dynamic_workspaces: bool,
    pub show_empty_workspaces: bool,
    pub names: Vec<String>,
}

/// An immutable view of all tracked workspaces. Rebuilt from scratch on every update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspacesSnapshot {
    pub workspaces: Vec<WorkspaceSlot>,
    pub current_index: usize,
    pub number_of_enabled_workspaces: usize,
    /// Index of the last workspace the bar can show. Drops past the last box land here.
    pub last_visible_workspace: usize,
    pub dynamic_workspaces: bool,
}

impl WorkspacesSnapshot {
    pub fn empty() -> Self {
        Self {
            workspaces: Vec::new(),
            current_index: 0,
            number_of_enabled_workspaces: 0,
            last_visible_workspace: 0,
            dynamic_workspaces: false,
        }
    }

    /// Builds the snapshot. `has_windows` is only consulted for enabled indices.
    pub fn derive(inputs: &SnapshotInputs, has_windows: impl Fn(usize) -> bool) -> Self {
        let count = inputs.enabled_count;
        let current = inputs.current_index;
        let hide_empty_dynamic = inputs.dynamic_workspaces && !inputs.show_empty_workspaces;

        let last_visible_workspace = if hide_empty_dynamic && current != count.wrapping_sub(1) {
            count.saturating_sub(2)
        } else {
            count.saturating_sub(1)
        };

        let tracked = count.max(inputs.names.len());
        let workspaces = (0..tracked)
            .map(|index| {
                let name = inputs.names.get(index).cloned();
                if index < count {
                    let has_windows = has_windows(index);
                    let is_visible = if has_windows || index == current {
                        true
                    } else if hide_empty_dynamic {
                        false
                    } else {
                        inputs.show_empty_workspaces
                    };
                    WorkspaceSlot { index, is_enabled: true, is_visible, has_windows, name }
                } else {
                    WorkspaceSlot { index, is_enabled: false, is_visible: false, has_windows: false, name }
                }
            })
            .collect();

        Self {
            workspaces,
            current_index: current,
            number_of_enabled_workspaces: count,
            last_visible_workspace,
            dynamic_workspaces: inputs.dynamic_workspaces,
        }
    }

    /// Whether `slot` is the trailing workspace dynamic workspaces keep around,
    /// while it is unused and not focused.
    ///
    /// Display names, smart-name eviction and name clearing all decide "is this
    /// the spare" through this one predicate.
    pub fn is_extra_dynamic_workspace(&self, slot: &WorkspaceSlot) -> bool {
        self.dynamic_workspaces
            && slot.index > 0
            && slot.index + 1 == self.number_of_enabled_workspaces
            && !slot.has_windows
            && self.current_index != slot.index
    }

    /// `"+"` for the spare dynamic workspace, else the stored name or the 1-based index.
    pub fn display_name(&self, slot: &WorkspaceSlot) -> String {
        if self.is_extra_dynamic_workspace(slot) {
            return "+".to_string();
        }
        match slot.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => (slot.index + 1).to_string(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&WorkspaceSlot> {
        self.workspaces.get(index)
    }

    pub fn current(&self) -> Option<&WorkspaceSlot> {
        self.get(self.current_index)
    }

    /// Enabled slots shown in the bar, ascending.
    pub fn visible_workspaces(&self) -> impl Iterator<Item = &WorkspaceSlot> + '_ {
        self.workspaces.iter().filter(|slot| slot.is_enabled && slot.is_visible)
    }

    /// Enabled slots that are empty, hidden and not current.
    pub fn hidden_workspaces(&self) -> impl Iterator<Item = &WorkspaceSlot> + '_ {
        self.workspaces.iter().filter(move |slot| {
            slot.is_enabled && !slot.has_windows && slot.index != self.current_index
        })
    }
}

impl Default for WorkspacesSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn inputs(count: usize, current: usize, dynamic: bool, show_empty: bool) -> SnapshotInputs {
        SnapshotInputs {
            enabled_count: count,
            current_index: current,
            dynamic_workspaces: dynamic,
            show_empty_workspaces: show_empty,
            names: Vec::new(),
        }
    }

    #[test]
    fn test_last_visible_workspace_formula() {
        for count in 1..6 {
            for current in 0..count {
                for dynamic in [false, true] {
                    for show_empty in [false, true] {
                        for mask in 0u32..(1 << count) {
                            let snapshot = WorkspacesSnapshot::derive(
                                &inputs(count, current, dynamic, show_empty),
                                |i| mask & (1 << i) != 0,
                            );
                            let expected = if dynamic && !show_empty && current != count - 1 {
                                count - 2
                            } else {
                                count - 1
                            };
                            assert_eq!(snapshot.last_visible_workspace, expected);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_static_workspaces_hide_empty_non_current() {
        let mut inputs = inputs(3, 0, false, false);
        inputs.names = vec!["Work".into(), "".into(), "Play".into()];
        let snapshot = WorkspacesSnapshot::derive(&inputs, |i| i == 2);

        let visible: Vec<usize> = snapshot.visible_workspaces().map(|s| s.index).collect();
        assert_eq!(visible, vec![0, 2]);
        assert_eq!(snapshot.display_name(&snapshot.workspaces[1]), "2");
        assert_eq!(snapshot.display_name(&snapshot.workspaces[2]), "Play");
    }

    #[test]
    fn test_dynamic_spare_workspace() {
        let snapshot = WorkspacesSnapshot::derive(&inputs(4, 1, true, false), |i| i == 0);

        let spare = &snapshot.workspaces[3];
        assert!(!spare.is_visible);
        assert_eq!(snapshot.last_visible_workspace, 2);
        assert!(snapshot.is_extra_dynamic_workspace(spare));
        assert_eq!(snapshot.display_name(spare), "+");
        assert!(snapshot.workspaces[1].is_visible, "current workspace is always visible");
    }

    #[test]
    fn test_spare_predicate_requires_empty_non_current_non_first() {
        let only = WorkspacesSnapshot::derive(&inputs(1, 0, true, false), |_| false);
        assert!(!only.is_extra_dynamic_workspace(&only.workspaces[0]));

        let current = WorkspacesSnapshot::derive(&inputs(3, 2, true, false), |_| false);
        assert!(!current.is_extra_dynamic_workspace(&current.workspaces[2]));

        let used = WorkspacesSnapshot::derive(&inputs(3, 0, true, false), |i| i == 2);
        assert!(!used.is_extra_dynamic_workspace(&used.workspaces[2]));

        let static_ws = WorkspacesSnapshot::derive(&inputs(3, 0, false, false), |_| false);
        assert!(!static_ws.is_extra_dynamic_workspace(&static_ws.workspaces[2]));
    }

    #[test]
    fn test_show_empty_makes_all_enabled_visible() {
        let snapshot = WorkspacesSnapshot::derive(&inputs(3, 0, false, true), |_| false);
        assert_eq!(snapshot.visible_workspaces().count(), 3);
    }

    #[test]
    fn test_names_beyond_count_become_disabled_slots() {
        let mut inputs = inputs(2, 0, false, true);
        inputs.names = vec!["a".into(), "b".into(), "c".into(), "".into()];
        let snapshot = WorkspacesSnapshot::derive(&inputs, |_| true);

        assert_eq!(snapshot.workspaces.len(), 4);
        assert_eq!(
            snapshot.workspaces[2],
            WorkspaceSlot {
                index: 2,
                is_enabled: false,
                is_visible: false,
                has_windows: false,
                name: Some("c".into()),
            }
        );
        assert!(!snapshot.workspaces[3].has_name());
    }

    #[test]
    fn test_hidden_workspaces_lists_empty_non_current() {
        let snapshot = WorkspacesSnapshot::derive(&inputs(4, 1, false, false), |i| i == 2);
        let hidden: Vec<usize> = snapshot.hidden_workspaces().map(|s| s.index).collect();
        assert_eq!(hidden, vec![0, 3]);
    }

    #[test]
    fn test_empty_snapshot_has_no_slots() {
        let snapshot = WorkspacesSnapshot::derive(&inputs(0, 0, true, false), |_| true);
        assert!(snapshot.workspaces.is_empty());
        assert_eq!(snapshot.last_visible_workspace, 0);
        assert_eq!(snapshot, WorkspacesSnapshot { dynamic_workspaces: true, ..WorkspacesSnapshot::empty() });
    }
}
