//! Hyprland backend for capy-wm.
//!
//! Implements the WindowBackend trait for the Hyprland compositor.

mod monitors;

pub use monitors::WORKSPACES_PER_MONITOR;

use crate::{MonitorInfo, WindowBackend, WmEvent, send_event};
use hyprland::dispatch::{Dispatch, DispatchType, WindowIdentifier, WorkspaceIdentifierWithSpecial};
use hyprland::event_listener::EventListener;
use hyprland::shared::Address;
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

static RUNNING: AtomicBool = AtomicBool::new(false);

/// Hyprland needs a moment before a hotplugged monitor shows up in queries.
const HOTPLUG_SETTLE: Duration = Duration::from_millis(200);

/// Hyprland window manager backend.
pub struct HyprlandBackend;

impl HyprlandBackend {
    /// Create a new Hyprland backend instance.
    pub fn new() -> Self {
        Self
    }
}

impl Default for HyprlandBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowBackend for HyprlandBackend {
    fn monitors(&self) -> Vec<MonitorInfo> {
        monitors::snapshot()
    }

    fn workspace_count(&self) -> usize {
        WORKSPACES_PER_MONITOR as usize
    }

    fn active_workspace(&self) -> usize {
        let all = monitors::snapshot();
        let idx = monitors::focused_index(&all);
        all.get(idx)
            .map(|m| monitors::relative_index(idx, m.active_workspace))
            .unwrap_or(0)
    }

    fn switch_workspace(&self, index: usize) {
        let idx = monitors::focused_index(&monitors::snapshot());
        let id = monitors::absolute_id(idx, index);
        debug!("Dispatching workspace {}", id);
        if let Err(e) = Dispatch::call(DispatchType::Workspace(WorkspaceIdentifierWithSpecial::Id(
            id,
        ))) {
            warn!("Failed to switch to workspace {}: {}", id, e);
        }
    }

    fn focus_window(&self, address: &str) {
        debug!("Focusing window {}", address);
        if let Err(e) = Dispatch::call(DispatchType::FocusWindow(WindowIdentifier::Address(
            Address::new(address),
        ))) {
            warn!("Failed to focus window {}: {}", address, e);
        }
    }

    fn start_listener(&self) {
        if RUNNING.swap(true, Ordering::SeqCst) {
            info!("Hyprland listener already running");
            return;
        }

        info!("Starting Hyprland event listener...");

        thread::spawn(move || {
            let mut listener = EventListener::new();

            // Monitor hotplug handlers
            listener.add_monitor_added_handler(|event_data| {
                debug!("Monitor added: {}", event_data.name);
                thread::sleep(HOTPLUG_SETTLE);
                send_event(WmEvent::MonitorAdded(event_data.name));
            });

            listener.add_monitor_removed_handler(|name| {
                debug!("Monitor removed: {}", name);
                thread::sleep(HOTPLUG_SETTLE);
                send_event(WmEvent::MonitorRemoved(name));
            });

            listener.add_urgent_state_changed_handler(|addr| {
                debug!("Urgent state changed: {:?}", addr);
                send_event(WmEvent::WindowUrgent(addr.to_string()));
            });

            info!("Hyprland event listener active");
            if let Err(e) = listener.start_listener() {
                error!("Hyprland listener failed: {}", e);
                RUNNING.store(false, Ordering::SeqCst);
            }
        });
    }
}
