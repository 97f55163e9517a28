//! Module registry: one boolean setting per module.
//!
//! The registry is the only caller of `activate`/`deactivate`. It guarantees
//! that `activate` never runs twice without a `deactivate` in between, and on
//! `stop()` it deactivates everything after cutting off setting changes.

use crate::settings::SettingsStore;
use crate::signal::HandlerId;
use log::{debug, info, warn};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// An independently toggleable behavior unit.
pub trait Module {
    fn name(&self) -> &'static str;

    /// Start the behavior. Only called while inactive.
    fn activate(&mut self);

    /// Stop the behavior and release everything `activate` acquired.
    /// Must be a no-op when already inactive or never activated.
    fn deactivate(&mut self);
}

struct Binding {
    key: String,
    module: Box<dyn Module>,
    active: bool,
}

impl Binding {
    /// Bring the module in line with `enabled`.
    fn apply(&mut self, enabled: bool) {
        if enabled {
            if self.active {
                debug!("{} already active, ignoring", self.module.name());
                return;
            }
            info!("Activating {}", self.module.name());
            self.module.activate();
            self.active = true;
        } else {
            if self.active {
                info!("Deactivating {}", self.module.name());
            }
            self.module.deactivate();
            self.active = false;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RegistryState {
    Idle,
    Running,
    Stopped,
}

pub struct ModuleRegistry {
    settings: Rc<dyn SettingsStore>,
    bindings: Vec<Rc<RefCell<Binding>>>,
    signals: Vec<HandlerId>,
    /// Shared with the change callbacks so late deliveries are dropped.
    running: Rc<Cell<bool>>,
    state: RegistryState,
}

impl ModuleRegistry {
    pub fn new(settings: Rc<dyn SettingsStore>) -> Self {
        Self {
            settings,
            bindings: Vec::new(),
            signals: Vec::new(),
            running: Rc::new(Cell::new(false)),
            state: RegistryState::Idle,
        }
    }

    /// Bind `module` to the boolean setting `key`. Does not activate.
    pub fn register<M: Module + 'static>(&mut self, key: &str, module: M) {
        if self.state != RegistryState::Idle {
            warn!("Ignoring late registration of {}", module.name());
            return;
        }
        debug!("Registered {} on {}", module.name(), key);
        self.bindings.push(Rc::new(RefCell::new(Binding {
            key: key.to_string(),
            module: Box::new(module),
            active: false,
        })));
    }

    /// Apply the current settings, then follow every change.
    pub fn start(&mut self) {
        if self.state != RegistryState::Idle {
            warn!("Module registry already started");
            return;
        }

        info!("Starting {} module(s)", self.bindings.len());
        self.state = RegistryState::Running;
        self.running.set(true);

        for binding in &self.bindings {
            let key = binding.borrow().key.clone();
            let enabled = self.settings.get_boolean(&key);
            binding.borrow_mut().apply(enabled);

            let weak = Rc::downgrade(binding);
            let running = self.running.clone();
            let id = self.settings.connect_changed(
                &key,
                Box::new(move |settings, key| {
                    if !running.get() {
                        debug!("Ignoring change of {} after stop", key);
                        return;
                    }
                    let Some(binding) = weak.upgrade() else {
                        return;
                    };
                    let enabled = settings.get_boolean(key);
                    binding.borrow_mut().apply(enabled);
                }),
            );
            self.signals.push(id);
        }
    }

    /// Disconnect from the settings, then deactivate every module in
    /// registration order. Safe to call more than once.
    pub fn stop(&mut self) {
        if self.state == RegistryState::Stopped {
            return;
        }

        info!("Stopping {} module(s)", self.bindings.len());
        self.running.set(false);
        for id in self.signals.drain(..) {
            self.settings.disconnect(id);
        }

        for binding in &self.bindings {
            binding.borrow_mut().apply(false);
        }
        self.state = RegistryState::Stopped;
    }

    /// Setting keys with a bound module, in registration order.
    pub fn keys(&self) -> Vec<String> {
        self.bindings.iter().map(|b| b.borrow().key.clone()).collect()
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.bindings
            .iter()
            .map(|b| b.borrow())
            .any(|b| b.key == key && b.active)
    }

    /// Names of the active modules, in registration order.
    pub fn active_modules(&self) -> Vec<&'static str> {
        self.bindings
            .iter()
            .map(|b| b.borrow())
            .filter(|b| b.active)
            .map(|b| b.module.name())
            .collect()
    }
}

impl Drop for ModuleRegistry {
    fn drop(&mut self) {
        if self.state == RegistryState::Running {
            self.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemorySettings;

    /// Records every lifecycle call into a shared log.
    struct Probe {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
        live: bool,
    }

    impl Probe {
        fn new(name: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Self {
            Self {
                name,
                log: log.clone(),
                live: false,
            }
        }
    }

    impl Module for Probe {
        fn name(&self) -> &'static str {
            self.name
        }

        fn activate(&mut self) {
            assert!(!self.live, "{} activated twice", self.name);
            self.live = true;
            self.log.borrow_mut().push(format!("+{}", self.name));
        }

        fn deactivate(&mut self) {
            self.live = false;
            self.log.borrow_mut().push(format!("-{}", self.name));
        }
    }

    fn setup() -> (Rc<MemorySettings>, Rc<RefCell<Vec<String>>>, ModuleRegistry) {
        let settings = Rc::new(MemorySettings::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ModuleRegistry::new(settings.clone());
        registry.register("a", Probe::new("a", &log));
        registry.register("b", Probe::new("b", &log));
        (settings, log, registry)
    }

    #[test]
    fn test_register_does_not_activate() {
        let (_, log, _registry) = setup();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_start_applies_current_values() {
        let (settings, log, mut registry) = setup();
        settings.set_boolean("b", true);

        registry.start();
        assert_eq!(*log.borrow(), vec!["-a", "+b"]);
        assert_eq!(registry.active_modules(), vec!["b"]);
    }

    #[test]
    fn test_each_change_calls_exactly_one_hook() {
        let (settings, log, mut registry) = setup();
        registry.start();
        log.borrow_mut().clear();

        settings.set_boolean("a", true);
        settings.set_boolean("a", false);
        settings.set_boolean("a", true);
        assert_eq!(*log.borrow(), vec!["+a", "-a", "+a"]);
        assert!(registry.is_active("a"));
        assert!(!registry.is_active("b"));
    }

    #[test]
    fn test_stop_disconnects_then_deactivates_all() {
        let (settings, log, mut registry) = setup();
        settings.set_boolean("a", true);
        registry.start();
        log.borrow_mut().clear();

        registry.stop();
        assert_eq!(*log.borrow(), vec!["-a", "-b"]);
        assert_eq!(settings.handler_count(), 0);

        settings.set_boolean("b", true);
        assert_eq!(*log.borrow(), vec!["-a", "-b"]);
        assert!(registry.active_modules().is_empty());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (_, log, mut registry) = setup();
        registry.start();
        registry.stop();
        let calls = log.borrow().len();
        registry.stop();
        assert_eq!(log.borrow().len(), calls);
    }

    #[test]
    fn test_change_delivered_during_stop_is_ignored() {
        let settings = Rc::new(MemorySettings::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        let registry = Rc::new(RefCell::new(ModuleRegistry::new(settings.clone())));
        registry.borrow_mut().register("a", Probe::new("a", &log));

        // Connected ahead of the registry, so it runs first in the same emission.
        let stopper = Rc::downgrade(&registry);
        settings.connect_changed(
            "a",
            Box::new(move |_, _| {
                if let Some(registry) = stopper.upgrade() {
                    registry.borrow_mut().stop();
                }
            }),
        );
        registry.borrow_mut().start();
        log.borrow_mut().clear();

        settings.set_boolean("a", true);
        assert_eq!(*log.borrow(), vec!["-a"]);
        assert!(!registry.borrow().is_active("a"));
    }

    #[test]
    fn test_drop_stops_running_registry() {
        let (settings, log, mut registry) = setup();
        settings.set_boolean("a", true);
        registry.start();
        drop(registry);

        assert_eq!(log.borrow().last().map(String::as_str), Some("-b"));
        assert_eq!(settings.handler_count(), 0);
    }
}
