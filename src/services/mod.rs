//! Host services for CapyTweaks.
//!
//! Each service implements one boundary of the tweak core on top of the
//! running system. Background threads only talk to the UI loop through the
//! event bus.
//!
//! - `settings` - JSON settings file, watcher and the live store
//! - `layout` - Monitor and panel geometry from the window manager
//! - `shell` - Window focus and workspaces through the window manager
//! - `wm` - Backend detection and the event listener bridge

pub mod layout;
pub mod settings;
pub mod shell;
pub mod wm;
