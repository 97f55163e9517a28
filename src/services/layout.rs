//! Layout source backed by the window manager's monitor list.
//!
//! There is no compositor-side startup signal on Hyprland, so startup ends
//! with the first non-empty monitor snapshot. The panel is the CapyShell
//! taskbar: full width of the first monitor, [`TASKBAR_HEIGHT`] tall.

use capy_tweaks::layout::{LayoutEvent, LayoutSource, Monitor, PanelGeometry, PanelProperty};
use capy_tweaks::signal::{HandlerId, HandlerIds, SignalTable};
use capy_wm::MonitorInfo;
use log::{debug, info};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub const TASKBAR_HEIGHT: f64 = 48.0;

pub struct HostLayout {
    monitors: RefCell<Vec<MonitorInfo>>,
    starting_up: Cell<bool>,
    ids: HandlerIds,
    events: SignalTable<LayoutEvent, dyn Fn()>,
    panel_signals: SignalTable<PanelProperty, dyn Fn()>,
}

impl HostLayout {
    pub fn new() -> Self {
        Self {
            monitors: RefCell::new(Vec::new()),
            starting_up: Cell::new(true),
            ids: HandlerIds::new(),
            events: SignalTable::new(),
            panel_signals: SignalTable::new(),
        }
    }

    /// Replace the monitor snapshot and fire the matching signals.
    pub fn update(&self, monitors: Vec<MonitorInfo>) {
        if monitors.is_empty() {
            debug!("Empty monitor snapshot, keeping {:?}", self.monitor_names());
            return;
        }

        let old_panel = self.panel_geometry();
        let old_scale = self.scale_factor();
        let moved = !same_geometry(&self.monitors.borrow(), &monitors);
        *self.monitors.borrow_mut() = monitors;
        let changed = moved || self.scale_factor() != old_scale;

        if self.starting_up.get() {
            self.starting_up.set(false);
            info!("Layout ready: {}", self.monitor_names().join(", "));
            self.emit(LayoutEvent::StartupComplete);
            return;
        }

        if !changed {
            return;
        }

        info!("Monitors changed: {}", self.monitor_names().join(", "));
        self.emit(LayoutEvent::MonitorsChanged);
        self.emit(LayoutEvent::WorkareasChanged);

        if self.panel_geometry() != old_panel {
            self.emit_panel(PanelProperty::Size);
        }
    }

    /// Offset of the panel in stage coordinates.
    pub fn panel_origin(&self) -> (f64, f64) {
        self.monitors
            .borrow()
            .first()
            .map(|m| (f64::from(m.x), f64::from(m.y)))
            .unwrap_or((0.0, 0.0))
    }

    fn monitor_names(&self) -> Vec<String> {
        self.monitors
            .borrow()
            .iter()
            .map(|m| m.name.clone())
            .collect()
    }

    fn emit(&self, event: LayoutEvent) {
        for handler in self.events.snapshot(&event) {
            handler();
        }
    }

    fn emit_panel(&self, property: PanelProperty) {
        for handler in self.panel_signals.snapshot(&property) {
            handler();
        }
    }
}

/// Focus and active workspace don't affect where corners go.
fn same_geometry(a: &[MonitorInfo], b: &[MonitorInfo]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(a, b)| {
            a.name == b.name
                && (a.x, a.y, a.width, a.height) == (b.x, b.y, b.width, b.height)
                && a.scale == b.scale
        })
}

impl Default for HostLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutSource for HostLayout {
    fn monitors(&self) -> Vec<Monitor> {
        self.monitors
            .borrow()
            .iter()
            .map(|m| Monitor::new(m.x, m.y, m.width, m.height))
            .collect()
    }

    fn panel_geometry(&self) -> PanelGeometry {
        self.monitors
            .borrow()
            .first()
            .map(|m| PanelGeometry {
                width: f64::from(m.width),
                height: TASKBAR_HEIGHT,
            })
            .unwrap_or_default()
    }

    fn scale_factor(&self) -> f64 {
        let monitors = self.monitors.borrow();
        monitors
            .iter()
            .find(|m| m.focused)
            .or_else(|| monitors.first())
            .map(|m| m.scale)
            .filter(|scale| *scale > 0.0)
            .unwrap_or(1.0)
    }

    fn starting_up(&self) -> bool {
        self.starting_up.get()
    }

    /// Hyprland has no overview, so the panel never changes pseudo-class.
    fn panel_style_pseudo_class(&self) -> Option<String> {
        None
    }

    fn connect(&self, event: LayoutEvent, callback: Box<dyn Fn()>) -> HandlerId {
        let id = self.ids.next();
        self.events.insert(id, event, Rc::from(callback));
        id
    }

    fn connect_panel(&self, property: PanelProperty, callback: Box<dyn Fn()>) -> HandlerId {
        let id = self.ids.next();
        self.panel_signals.insert(id, property, Rc::from(callback));
        id
    }

    fn disconnect(&self, id: HandlerId) {
        if !self.events.disconnect(id) && !self.panel_signals.disconnect(id) {
            debug!("Layout handler {:?} was not connected", id);
        }
    }
}
