//! capy-tweaks: Toggleable behavior tweaks for the CapyShell desktop
//!
//! Platform-agnostic core. The host (compositor bridge, renderer, settings
//! backend) is reached only through the traits in [`settings`], [`layout`],
//! [`stage`] and [`shell`], so everything here runs on the host's UI thread
//! and can be driven by fakes in tests.
//!
//! - `registry` - Binds one boolean setting to each module and drives its lifecycle
//! - `event_bus` - Refcounted fan-out over the shared layout events
//! - `corners` - Screen and panel corner geometry, painting and fading
//! - `modules` - The smaller tweaks (wraparound, overview click, attention, favorites)

pub mod animation;
pub mod color;
pub mod corners;
pub mod error;
pub mod event_bus;
pub mod layout;
pub mod modules;
pub mod registry;
pub mod settings;
pub mod shell;
pub mod signal;
pub mod stage;

#[cfg(test)]
pub(crate) mod testing;

pub use color::Color;
pub use error::TweaksError;
pub use event_bus::SharedEventBus;
pub use layout::{LayoutEvent, LayoutSource, Monitor, PanelGeometry, PanelProperty};
pub use registry::{Module, ModuleRegistry};
pub use settings::{MemorySettings, SettingValue, SettingsStore};
pub use shell::ShellHost;
pub use signal::HandlerId;
pub use stage::{ActorId, Container, DrawContext, Painter, Stage};

use log::info;
use std::rc::Rc;

/// Host capabilities handed to every module.
///
/// Cloning is cheap: every field is reference counted, and the bus shares its
/// subscription tables between clones.
#[derive(Clone)]
pub struct TweakContext {
    pub settings: Rc<dyn SettingsStore>,
    pub layout: Rc<dyn LayoutSource>,
    pub stage: Rc<dyn Stage>,
    pub shell: Rc<dyn ShellHost>,
    pub bus: SharedEventBus,
}

impl TweakContext {
    pub fn new(
        settings: Rc<dyn SettingsStore>,
        layout: Rc<dyn LayoutSource>,
        stage: Rc<dyn Stage>,
        shell: Rc<dyn ShellHost>,
    ) -> Self {
        let bus = SharedEventBus::new(layout.clone());
        Self {
            settings,
            layout,
            stage,
            shell,
            bus,
        }
    }
}

/// Build a registry with every built-in tweak bound to its setting key.
///
/// The navigator is shared with whoever performs workspace switches, so the
/// wraparound module can swap its strategy.
pub fn default_registry(
    ctx: &TweakContext,
    navigator: Rc<modules::WorkspaceNavigator>,
) -> ModuleRegistry {
    use modules::*;
    use settings::keys;

    let mut registry = ModuleRegistry::new(ctx.settings.clone());
    registry.register(
        keys::SCREEN_CORNERS,
        corners::ScreenCorners::new(ctx.clone()),
    );
    registry.register(keys::PANEL_CORNERS, corners::PanelCorners::new(ctx.clone()));
    registry.register(
        keys::WORKSPACE_WRAPAROUND,
        WorkspaceWraparound::new(navigator),
    );
    if ctx.shell.has_overview() {
        registry.register(
            keys::CLICK_TO_CLOSE_OVERVIEW,
            ClickToCloseOverview::new(ctx.shell.clone()),
        );
    } else {
        info!("Shell has no overview, {} unavailable", keys::CLICK_TO_CLOSE_OVERVIEW);
    }
    registry.register(
        keys::NO_WINDOW_READY_NOTIFICATIONS,
        WindowAttention::new(ctx.shell.clone()),
    );
    if ctx.shell.has_favorite_notifications() {
        registry.register(
            keys::NO_FAVORITE_NOTIFICATIONS,
            FavoriteNotifications::new(ctx.shell.clone()),
        );
    } else {
        info!(
            "Shell has no favorite notifications, {} unavailable",
            keys::NO_FAVORITE_NOTIFICATIONS
        );
    }
    registry
}
