//! Shell boundary for the smaller tweaks: windows, overview, workspaces.

use crate::signal::HandlerId;

/// Host window handle (an address or object path, depending on the host).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WindowId(pub String);

impl WindowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

pub const BUTTON_PRIMARY: u32 = 1;

/// A click recognized on the overview background.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverviewClick {
    pub button: u32,
    /// Whether the search entry is the picked actor or one of its ancestors.
    pub on_search_entry: bool,
}

pub trait ShellHost {
    /// Whether the shell has an overview that can be shown and clicked.
    fn has_overview(&self) -> bool {
        true
    }

    /// Whether the shell notifies when favorites are pinned or unpinned.
    fn has_favorite_notifications(&self) -> bool {
        true
    }

    fn overview_visible(&self) -> bool;

    fn toggle_overview(&self);

    /// Focus and raise a window.
    fn activate_window(&self, window: &WindowId);

    fn connect_window_demands_attention(&self, callback: Box<dyn Fn(&WindowId)>) -> HandlerId;

    fn connect_overview_clicked(&self, callback: Box<dyn Fn(&OverviewClick)>) -> HandlerId;

    fn disconnect(&self, id: HandlerId);

    /// Enable or silence the "pinned to dash" / "unpinned" notifications.
    fn set_favorite_notifications(&self, enabled: bool);

    /// Index of the active workspace.
    fn active_workspace(&self) -> usize;

    fn workspace_count(&self) -> usize;

    fn switch_workspace(&self, index: usize);
}
