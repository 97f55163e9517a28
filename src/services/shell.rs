//! Shell host backed by the window manager backend.

use capy_tweaks::ShellHost;
use capy_tweaks::shell::{OverviewClick, WindowId};
use capy_tweaks::signal::{HandlerId, HandlerIds, SignalTable};
use capy_wm::WindowBackend;
use log::{debug, warn};
use std::rc::Rc;

pub struct HostShell {
    backend: Rc<dyn WindowBackend>,
    ids: HandlerIds,
    attention: SignalTable<(), dyn Fn(&WindowId)>,
}

impl HostShell {
    pub fn new(backend: Rc<dyn WindowBackend>) -> Self {
        Self {
            backend,
            ids: HandlerIds::new(),
            attention: SignalTable::new(),
        }
    }

    /// Deliver an urgent-window event from the listener.
    pub fn window_urgent(&self, address: &str) {
        let window = WindowId::new(address);
        let handlers = self.attention.snapshot(&());
        if handlers.is_empty() {
            debug!("Window {} wants attention, nobody listening", address);
        }
        for handler in handlers {
            handler(&window);
        }
    }
}

/// Hyprland has no overview and no favorites, so the tweaks built on them
/// are never registered against this host.
impl ShellHost for HostShell {
    fn has_overview(&self) -> bool {
        false
    }

    fn has_favorite_notifications(&self) -> bool {
        false
    }

    fn overview_visible(&self) -> bool {
        false
    }

    fn toggle_overview(&self) {
        debug!("No overview to toggle");
    }

    fn activate_window(&self, window: &WindowId) {
        self.backend.focus_window(&window.0);
    }

    fn connect_window_demands_attention(&self, callback: Box<dyn Fn(&WindowId)>) -> HandlerId {
        let id = self.ids.next();
        self.attention.insert(id, (), Rc::from(callback));
        id
    }

    fn connect_overview_clicked(&self, _callback: Box<dyn Fn(&OverviewClick)>) -> HandlerId {
        warn!("No overview to click, handler will never fire");
        self.ids.next()
    }

    fn disconnect(&self, id: HandlerId) {
        if !self.attention.disconnect(id) {
            debug!("Shell handler {:?} was not connected", id);
        }
    }

    fn set_favorite_notifications(&self, enabled: bool) {
        warn!("No favorite notifications to toggle ({})", enabled);
    }

    fn active_workspace(&self) -> usize {
        self.backend.active_workspace()
    }

    fn workspace_count(&self) -> usize {
        self.backend.workspace_count()
    }

    fn switch_workspace(&self, index: usize) {
        self.backend.switch_workspace(index);
    }
}
