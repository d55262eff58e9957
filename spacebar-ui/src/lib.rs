//! # Spacebar UI Library (`spacebar-ui`)
//!
//! The workspace bar on top of the [`spacebar_domain`] engine.
//!
//! - [`bar`]: draws one box per visible workspace and handles clicks on them.
//! - [`drag`]: reordering boxes by drag-and-drop and dropping windows on boxes.
//! - [`menu`]: the bar's companion menu.
//! - [`scroll`]: switching workspaces with the scroll wheel.
//! - [`widget`]: the toolkit-facing traits all of the above draw through.
//!
//! [`Spacebar`] wires everything to a [`ShellIntegration`] and owns the
//! enable/disable life cycle.

pub mod bar;
pub mod click;
pub mod drag;
pub mod error;
pub mod menu;
pub mod scroll;
pub mod widget;

pub use bar::WorkspaceBarController;
pub use error::{UiError, UiResult};
pub use menu::WorkspacesBarMenu;
pub use scroll::ScrollHandler;

use parking_lot::Mutex;
use spacebar_core::{BarConfig, ConfigLoader};
use spacebar_domain::{DomainError, HostServices, KeyBindingRegistrar, KeyBindings, Settings, SettingsStore, Workspaces};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use crate::widget::{BarWidget, MenuView, ScrollSource};

/// Everything the shell provides to spacebar.
#[derive(Clone)]
pub struct ShellIntegration {
    pub settings_store: Arc<dyn SettingsStore>,
    pub host: HostServices,
    pub key_bindings: Arc<dyn KeyBindingRegistrar>,
    pub bar: Arc<dyn BarWidget>,
    pub menu: Arc<dyn MenuView>,
    /// The whole top panel.
    pub panel_scroll: Arc<dyn ScrollSource>,
    /// The bar's panel button only.
    pub bar_scroll: Arc<dyn ScrollSource>,
}

struct Components {
    settings: Arc<Settings>,
    workspaces: Arc<Workspaces>,
    key_bindings: Arc<KeyBindings>,
    bar: Arc<WorkspaceBarController>,
    menu: Arc<WorkspacesBarMenu>,
    scroll: Arc<ScrollHandler>,
}

/// The extension entry point.
pub struct Spacebar {
    integration: ShellIntegration,
    config: BarConfig,
    components: Mutex<Option<Components>>,
}

impl Spacebar {
    pub fn new(integration: ShellIntegration, config: BarConfig) -> Self {
        Self { integration, config, components: Mutex::new(None) }
    }

    /// Builds a [`Spacebar`] with the `[bar]` section of the configuration file at `path`.
    pub fn from_config_file(integration: ShellIntegration, path: &Path) -> UiResult<Self> {
        let config = ConfigLoader::load_from_path(path)?;
        Ok(Self::new(integration, config.bar))
    }

    /// Creates and connects all components. Does nothing when already enabled.
    pub fn enable(&self) -> UiResult<()> {
        if self.is_enabled() {
            return Ok(());
        }
        let integration = &self.integration;
        let settings = Settings::bind(integration.settings_store.clone()).map_err(DomainError::from)?;
        integration.host.show_activities(false);

        let workspaces = Workspaces::new(settings.clone(), integration.host.clone(), &self.config);
        workspaces.init();

        let key_bindings = KeyBindings::new(integration.key_bindings.clone(), &workspaces);
        key_bindings.init();

        let bar = WorkspaceBarController::new(workspaces.clone(), integration.bar.clone(), &self.config);
        bar.init();

        let menu = WorkspacesBarMenu::new(workspaces.clone(), integration.menu.clone());
        menu.init(&key_bindings);

        let scroll = ScrollHandler::new(
            workspaces.clone(),
            integration.panel_scroll.clone(),
            integration.bar_scroll.clone(),
        );
        scroll.init();

        *self.components.lock() = Some(Components { settings, workspaces, key_bindings, bar, menu, scroll });
        info!("Spacebar enabled");
        Ok(())
    }

    /// Tears everything down in reverse order and shows the activities button again.
    pub fn disable(&self) {
        let Some(components) = self.components.lock().take() else {
            return;
        };
        components.scroll.destroy();
        components.menu.destroy();
        components.bar.destroy();
        components.key_bindings.destroy();
        components.workspaces.destroy();
        components.settings.destroy();
        self.integration.host.show_activities(true);
        info!("Spacebar disabled");
    }

    pub fn is_enabled(&self) -> bool {
        self.components.lock().is_some()
    }

    pub fn config(&self) -> &BarConfig {
        &self.config
    }

    pub fn workspaces(&self) -> Option<Arc<Workspaces>> {
        self.components.lock().as_ref().map(|c| c.workspaces.clone())
    }

    pub fn bar(&self) -> Option<Arc<WorkspaceBarController>> {
        self.components.lock().as_ref().map(|c| c.bar.clone())
    }

    pub fn menu(&self) -> Option<Arc<WorkspacesBarMenu>> {
        self.components.lock().as_ref().map(|c| c.menu.clone())
    }

    pub fn key_bindings(&self) -> Option<Arc<KeyBindings>> {
        self.components.lock().as_ref().map(|c| c.key_bindings.clone())
    }
}

impl Drop for Spacebar {
    fn drop(&mut self) {
        self.disable();
    }
}
