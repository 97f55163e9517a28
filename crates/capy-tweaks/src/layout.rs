//! Layout boundary: monitors, panel geometry and their change signals.

use crate::signal::HandlerId;

/// Layout events shared between modules through the [`SharedEventBus`].
///
/// [`SharedEventBus`]: crate::event_bus::SharedEventBus
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayoutEvent {
    /// Fires once, after which `starting_up()` is false.
    StartupComplete,
    MonitorsChanged,
    WorkareasChanged,
}

impl LayoutEvent {
    pub const ALL: [LayoutEvent; 3] = [
        LayoutEvent::StartupComplete,
        LayoutEvent::MonitorsChanged,
        LayoutEvent::WorkareasChanged,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LayoutEvent::StartupComplete => "startup-complete",
            LayoutEvent::MonitorsChanged => "monitors-changed",
            LayoutEvent::WorkareasChanged => "workareas-changed",
        }
    }
}

impl std::fmt::Display for LayoutEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Panel notifications connected per actor rather than through the bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PanelProperty {
    Position,
    Size,
    /// Style or pseudo-class changed (theme switch, entering the overview).
    Style,
}

/// Monitor rectangle in stage coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Monitor {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Monitor {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PanelGeometry {
    pub width: f64,
    pub height: f64,
}

/// Source of monitor and panel geometry.
pub trait LayoutSource {
    /// Monitors in host order.
    fn monitors(&self) -> Vec<Monitor>;

    fn panel_geometry(&self) -> PanelGeometry;

    fn scale_factor(&self) -> f64;

    /// True until `startup-complete` has fired.
    fn starting_up(&self) -> bool;

    /// The panel's current style pseudo-class, e.g. `"overview"`.
    fn panel_style_pseudo_class(&self) -> Option<String>;

    fn connect(&self, event: LayoutEvent, callback: Box<dyn Fn()>) -> HandlerId;

    fn connect_panel(&self, property: PanelProperty, callback: Box<dyn Fn()>) -> HandlerId;

    /// Disconnect a handler from either `connect` or `connect_panel`.
    fn disconnect(&self, id: HandlerId);
}
