//! Monitor snapshot and per-monitor workspace ranges for Hyprland.
//!
//! Workspaces are laid out in fixed blocks: monitor `n` (in Hyprland's
//! order) owns absolute ids `n * WORKSPACES_PER_MONITOR + 1` onward.

use crate::MonitorInfo;
use hyprland::data::Monitors;
use hyprland::shared::{HyprData, HyprDataVec};
use log::warn;

/// Number of workspaces per monitor.
pub const WORKSPACES_PER_MONITOR: i32 = 10;

/// Current monitors, or an empty list if Hyprland can't be reached.
pub fn snapshot() -> Vec<MonitorInfo> {
    match Monitors::get() {
        Ok(monitors) => monitors
            .to_vec()
            .into_iter()
            .map(|m| MonitorInfo {
                name: m.name,
                x: m.x,
                y: m.y,
                width: i32::from(m.width),
                height: i32::from(m.height),
                scale: f64::from(m.scale),
                focused: m.focused,
                active_workspace: m.active_workspace.id,
            })
            .collect(),
        Err(e) => {
            warn!("Failed to query Hyprland monitors: {}", e);
            Vec::new()
        }
    }
}

/// Position of the focused monitor (first monitor if none is focused).
pub fn focused_index(monitors: &[MonitorInfo]) -> usize {
    monitors.iter().position(|m| m.focused).unwrap_or(0)
}

/// First absolute workspace id of the block owned by monitor `monitor_idx`.
pub fn first_workspace_id(monitor_idx: usize) -> i32 {
    monitor_idx as i32 * WORKSPACES_PER_MONITOR + 1
}

/// 0-based index of `workspace_id` within the monitor's block, clamped.
pub fn relative_index(monitor_idx: usize, workspace_id: i32) -> usize {
    let offset = workspace_id - first_workspace_id(monitor_idx);
    offset.clamp(0, WORKSPACES_PER_MONITOR - 1) as usize
}

/// Absolute workspace id for `index` on monitor `monitor_idx`.
pub fn absolute_id(monitor_idx: usize, index: usize) -> i32 {
    let index = (index as i32).min(WORKSPACES_PER_MONITOR - 1);
    first_workspace_id(monitor_idx) + index
}
