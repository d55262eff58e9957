//! Global keyboard shortcuts driving the workspace engine.

use parking_lot::Mutex;
use spacebar_core::DisposerList;
use std::sync::{Arc, Weak};
use tracing::debug;

use crate::settings::Observable;
use crate::workspaces::{ActivateOptions, Workspaces};

pub type KeyBindingHandler = Arc<dyn Fn() + Send + Sync + 'static>;

/// Number of workspaces reachable through numbered shortcuts.
pub const NUMBERED_SHORTCUTS: usize = 10;

/// The shell's shortcut registry.
pub trait KeyBindingRegistrar: Send + Sync {
    /// Registers `handler` under the shortcut stored in the extension's settings as `name`.
    fn add_key_binding(&self, name: &str, handler: KeyBindingHandler);

    fn remove_key_binding(&self, name: &str);

    /// Writes the accelerators of a window-manager binding.
    fn set_desktop_binding(&self, name: &str, accelerators: Vec<String>);

    /// Restores the default of a window-manager binding.
    fn reset_desktop_binding(&self, name: &str);
}

/// Registers spacebar's shortcuts and removes them again on [`KeyBindings::destroy`].
pub struct KeyBindings {
    registrar: Arc<dyn KeyBindingRegistrar>,
    workspaces: Weak<Workspaces>,
    added: Mutex<Vec<String>>,
    subscriptions: DisposerList,
}

impl KeyBindings {
    pub fn new(registrar: Arc<dyn KeyBindingRegistrar>, workspaces: &Arc<Workspaces>) -> Arc<Self> {
        Arc::new(Self {
            registrar,
            workspaces: Arc::downgrade(workspaces),
            added: Mutex::new(Vec::new()),
            subscriptions: DisposerList::new(),
        })
    }

    pub fn init(self: &Arc<Self>) {
        let Some(workspaces) = self.workspaces.upgrade() else {
            return;
        };
        let settings = workspaces.settings();

        let weak = Arc::downgrade(self);
        self.subscriptions.push(settings.enable_activate_workspace_shortcuts.subscribe(
            Arc::new(move |enabled: &bool| {
                if let Some(this) = weak.upgrade() {
                    this.register_activate_by_number(*enabled);
                }
            }),
            true,
        ));
        let weak = Arc::downgrade(self);
        self.subscriptions.push(settings.enable_move_to_workspace_shortcuts.subscribe(
            Arc::new(move |enabled: &bool| {
                if let Some(this) = weak.upgrade() {
                    this.register_move_to_by_number(*enabled);
                }
            }),
            false,
        ));

        self.add_workspace_key_binding("activate-previous-key", |ws| ws.activate_previous());
        self.add_workspace_key_binding("new-workspace-key", |ws| ws.add_workspace());
    }

    /// Registers `handler` for the shortcut `name`, replacing an earlier registration.
    pub fn add_key_binding<F>(&self, name: &str, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        if self.is_added(name) {
            self.remove_key_binding(name);
        }
        debug!(name, "Adding key binding");
        self.registrar.add_key_binding(name, Arc::new(handler));
        self.added.lock().push(name.to_string());
    }

    pub fn is_added(&self, name: &str) -> bool {
        self.added.lock().iter().any(|added| added == name)
    }

    /// Names of the currently registered shortcuts, in registration order.
    pub fn added_key_bindings(&self) -> Vec<String> {
        self.added.lock().clone()
    }

    fn remove_key_binding(&self, name: &str) {
        let removed = {
            let mut added = self.added.lock();
            match added.iter().position(|added| added == name) {
                Some(position) => {
                    added.remove(position);
                    true
                }
                None => false,
            }
        };
        if removed {
            self.registrar.remove_key_binding(name);
        }
    }

    fn add_workspace_key_binding<F>(&self, name: &str, action: F)
    where
        F: Fn(&Workspaces) + Send + Sync + 'static,
    {
        let workspaces = self.workspaces.clone();
        self.add_key_binding(name, move || {
            if let Some(workspaces) = workspaces.upgrade() {
                action(&workspaces);
            }
        });
    }

    fn register_activate_by_number(&self, enabled: bool) {
        for i in 0..NUMBERED_SHORTCUTS {
            let name = format!("activate-{}-key", i + 1);
            if enabled {
                self.add_workspace_key_binding(&name, move |ws| {
                    ws.activate(i, ActivateOptions { focus_window_if_current_workspace: true })
                });
            } else {
                self.remove_key_binding(&name);
            }
        }
    }

    fn register_move_to_by_number(&self, enabled: bool) {
        for i in 0..NUMBERED_SHORTCUTS {
            let name = format!("move-to-workspace-{}", i + 1);
            if enabled {
                let accelerator = format!("<Super><Shift>{}", (i + 1) % 10);
                self.registrar.set_desktop_binding(&name, vec![accelerator]);
            } else {
                self.registrar.reset_desktop_binding(&name);
            }
        }
    }

    /// Unsubscribes from the settings and removes every added shortcut. Idempotent.
    pub fn destroy(&self) {
        self.subscriptions.dispose_all();
        let added: Vec<String> = std::mem::take(&mut *self.added.lock());
        for name in added {
            self.registrar.remove_key_binding(&name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{Settings, SettingsStore};
    use crate::testing::{FakeHost, HostCall};
    use mockall::mock;
    use spacebar_core::BarConfig;
    use std::collections::HashMap;

    mock! {
        pub Registrar {}
        impl KeyBindingRegistrar for Registrar {
            fn add_key_binding(&self, name: &str, handler: KeyBindingHandler);
            fn remove_key_binding(&self, name: &str);
            fn set_desktop_binding(&self, name: &str, accelerators: Vec<String>);
            fn reset_desktop_binding(&self, name: &str);
        }
    }

    fn engine(count: usize) -> (Arc<FakeHost>, Arc<Workspaces>) {
        let store: Arc<dyn SettingsStore> = Arc::new(Settings::default_store());
        let settings = Settings::bind(store).unwrap();
        settings.dynamic_workspaces.set_value(false);
        let host = FakeHost::new(count);
        let workspaces = Workspaces::new(settings, host.services(), &BarConfig::default());
        workspaces.init();
        (host, workspaces)
    }

    #[tokio::test]
    async fn test_init_registers_numbered_and_extension_bindings() {
        let (host, workspaces) = engine(4);
        let handlers: Arc<Mutex<HashMap<String, KeyBindingHandler>>> = Arc::default();
        let mut registrar = MockRegistrar::new();
        let handlers_clone = handlers.clone();
        registrar
            .expect_add_key_binding()
            .times(NUMBERED_SHORTCUTS + 2)
            .returning(move |name, handler| {
                handlers_clone.lock().insert(name.to_string(), handler);
            });
        registrar.expect_set_desktop_binding().never();

        let bindings = KeyBindings::new(Arc::new(registrar), &workspaces);
        bindings.init();

        assert!(bindings.is_added("activate-10-key"));
        assert!(bindings.is_added("new-workspace-key"));
        let handler = handlers.lock().get("activate-3-key").cloned().unwrap();
        handler();
        assert_eq!(host.calls().first(), Some(&HostCall::ActivateWorkspace(2)));
    }

    #[tokio::test]
    async fn test_disabling_activate_shortcuts_removes_them() {
        let (_host, workspaces) = engine(2);
        let mut registrar = MockRegistrar::new();
        registrar.expect_add_key_binding().return_const(());
        registrar
            .expect_remove_key_binding()
            .withf(|name| name.starts_with("activate-") && name.ends_with("-key"))
            .times(NUMBERED_SHORTCUTS)
            .return_const(());

        let bindings = KeyBindings::new(Arc::new(registrar), &workspaces);
        bindings.init();
        workspaces.settings().enable_activate_workspace_shortcuts.set_value(false);

        assert_eq!(
            bindings.added_key_bindings(),
            vec!["activate-previous-key".to_string(), "new-workspace-key".to_string()]
        );
    }

    #[tokio::test]
    async fn test_move_shortcuts_follow_setting() {
        let (_host, workspaces) = engine(2);
        let written: Arc<Mutex<Vec<(String, Vec<String>)>>> = Arc::default();
        let mut registrar = MockRegistrar::new();
        registrar.expect_add_key_binding().return_const(());
        let written_clone = written.clone();
        registrar
            .expect_set_desktop_binding()
            .times(NUMBERED_SHORTCUTS)
            .returning(move |name, accelerators| {
                written_clone.lock().push((name.to_string(), accelerators));
            });
        registrar
            .expect_reset_desktop_binding()
            .withf(|name| name.starts_with("move-to-workspace-"))
            .times(NUMBERED_SHORTCUTS)
            .return_const(());

        let bindings = KeyBindings::new(Arc::new(registrar), &workspaces);
        bindings.init();
        let setting = &workspaces.settings().enable_move_to_workspace_shortcuts;
        setting.set_value(true);
        setting.set_value(false);

        let written = written.lock();
        assert_eq!(
            written[0],
            ("move-to-workspace-1".to_string(), vec!["<Super><Shift>1".to_string()])
        );
        assert_eq!(
            written[9],
            ("move-to-workspace-10".to_string(), vec!["<Super><Shift>0".to_string()])
        );
    }

    #[tokio::test]
    async fn test_destroy_removes_every_added_binding() {
        let (_host, workspaces) = engine(2);
        let mut registrar = MockRegistrar::new();
        registrar.expect_add_key_binding().return_const(());
        registrar
            .expect_remove_key_binding()
            .times(NUMBERED_SHORTCUTS + 3)
            .return_const(());

        let bindings = KeyBindings::new(Arc::new(registrar), &workspaces);
        bindings.init();
        bindings.add_key_binding("open-menu", || {});
        bindings.destroy();
        bindings.destroy();

        assert!(bindings.added_key_bindings().is_empty());
        workspaces.settings().enable_activate_workspace_shortcuts.set_value(false);
    }
}
