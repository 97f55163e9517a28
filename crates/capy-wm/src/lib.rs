//! capy-wm: Window manager abstraction for the CapyTweaks host
//!
//! Provides monitor geometry, workspace switching, window focus and a
//! background event listener behind the [`WindowBackend`] trait.
//! Currently supports Hyprland.

pub mod types;
pub mod window_backend;

#[cfg(feature = "hyprland")]
pub mod hyprland;

pub use types::*;
pub use window_backend::*;

use std::sync::{Arc, OnceLock, RwLock};

/// Event callback type.
/// Called from the listener thread whenever a WM event occurs.
pub type EventCallback = Box<dyn Fn(WmEvent) + Send + Sync>;

static EVENT_CALLBACK: OnceLock<Arc<RwLock<Option<EventCallback>>>> = OnceLock::new();

fn get_event_callback_store() -> Arc<RwLock<Option<EventCallback>>> {
    EVENT_CALLBACK
        .get_or_init(|| Arc::new(RwLock::new(None)))
        .clone()
}

/// Set the event callback.
pub fn set_event_callback<F>(callback: F)
where
    F: Fn(WmEvent) + Send + Sync + 'static,
{
    if let Ok(mut guard) = get_event_callback_store().write() {
        *guard = Some(Box::new(callback));
    }
}

/// Sends a WM event to the configured callback, if any.
pub fn send_event(event: WmEvent) {
    if let Ok(guard) = get_event_callback_store().read() {
        if let Some(ref callback) = *guard {
            callback(event);
        }
    }
}
