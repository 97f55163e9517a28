//! Event bus for cross-thread communication.
//!
//! Design principles:
//! - Broadcast channel (tokio) - background threads never touch UI state
//! - Single polling timer on the UI loop
//! - Batch processing (drain all events per tick)
//!
//! The window manager listener and the settings watcher post [`HostEvent`]s
//! here; the UI loop drains them and applies them on its own thread.

use capy_wm::WmEvent;
use std::sync::OnceLock;
use tokio::sync::broadcast::{self, Receiver, Sender};

/// Broadcast channel capacity.
/// 64 is enough for burst handling without memory bloat.
/// Lagging receivers will skip old events (we only care about latest).
pub const CHANNEL_CAPACITY: usize = 64;

/// Events posted by background threads.
#[derive(Clone, Debug, PartialEq)]
pub enum HostEvent {
    /// Monitors were added or removed; the layout must be re-read.
    MonitorsChanged,
    /// A window asked for attention, passes its address.
    WindowUrgent(String),
    /// The settings file changed on disk.
    SettingsChanged,
}

impl HostEvent {
    /// Whether several pending events of this kind collapse into one.
    fn collapses(&self) -> bool {
        !matches!(self, HostEvent::WindowUrgent(_))
    }
}

impl From<WmEvent> for HostEvent {
    fn from(event: WmEvent) -> Self {
        match event {
            WmEvent::MonitorAdded(_) | WmEvent::MonitorRemoved(_) => HostEvent::MonitorsChanged,
            WmEvent::WindowUrgent(address) => HostEvent::WindowUrgent(address),
        }
    }
}

static HOST_SENDER: OnceLock<Sender<HostEvent>> = OnceLock::new();

fn get_sender() -> &'static Sender<HostEvent> {
    HOST_SENDER.get_or_init(|| {
        let (tx, _rx) = broadcast::channel(CHANNEL_CAPACITY);
        tx
    })
}

/// Send an event to the UI loop. Non-blocking.
/// If no receivers, the event is dropped (expected during startup).
#[inline]
pub fn send(event: HostEvent) {
    let _ = get_sender().send(event);
}

/// Subscribe to the event bus.
pub fn subscribe() -> Receiver<HostEvent> {
    get_sender().subscribe()
}

/// Drain all pending events, keeping only the latest of each collapsible
/// kind. Urgent-window events are all kept since each names a window.
/// Handles RecvError::Lagged by continuing to drain.
pub fn drain_latest(rx: &mut Receiver<HostEvent>) -> Vec<HostEvent> {
    let mut events = Vec::with_capacity(8);

    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(broadcast::error::TryRecvError::Empty) => break,
            Err(broadcast::error::TryRecvError::Lagged(_)) => continue, // Skip old, keep draining
            Err(broadcast::error::TryRecvError::Closed) => break,
        }
    }

    if events.len() <= 1 {
        return events;
    }

    let mut result: Vec<HostEvent> = Vec::with_capacity(events.len());
    for event in events.into_iter().rev() {
        if event.collapses() && result.contains(&event) {
            continue;
        }
        result.push(event);
    }

    result.reverse();
    result
}
