//! Core types for window manager abstraction.

/// Detected window manager type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WmType {
    Hyprland,
    Sway,
    Niri,
    Unknown,
}

impl std::fmt::Display for WmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WmType::Hyprland => write!(f, "Hyprland"),
            WmType::Sway => write!(f, "Sway"),
            WmType::Niri => write!(f, "Niri"),
            WmType::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A monitor as reported by the window manager.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct MonitorInfo {
    pub name: String,
    /// Position in the global layout, in logical pixels.
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub scale: f64,
    pub focused: bool,
    /// Absolute id of the workspace shown on this monitor.
    pub active_workspace: i32,
}

/// Events emitted by the window manager backend.
#[derive(Clone, Debug, PartialEq)]
pub enum WmEvent {
    /// Monitor added, passes the name of the monitor that was added.
    MonitorAdded(String),
    /// Monitor removed, passes the name of the monitor that was removed.
    MonitorRemoved(String),
    /// A window asked for attention, passes its address.
    WindowUrgent(String),
}
