//! Window manager service: picks the backend and forwards its events.

use crate::event_bus::{self, HostEvent};
use capy_wm::{WindowBackend, WmType, detect_wm};
use log::info;
use std::rc::Rc;

/// Backend for the running window manager, or `None` if unsupported.
pub fn connect() -> Option<Rc<dyn WindowBackend>> {
    let wm = detect_wm();
    info!("Detected window manager: {}", wm);
    if wm == WmType::Unknown {
        return None;
    }
    capy_wm::create_backend().map(Rc::from)
}

/// Route backend events onto the event bus and start listening.
/// The listener runs on its own thread.
pub fn start_listener(backend: &dyn WindowBackend) {
    capy_wm::set_event_callback(|event| event_bus::send(HostEvent::from(event)));
    backend.start_listener();
}
