//! In-memory settings store.
//!
//! The live store used on the UI thread. The settings file (or a settings UI)
//! pushes values in; change callbacks only fire when a value really changes.

use super::{ChangedCallback, SettingValue, SettingsStore, defaults};
use crate::signal::{HandlerId, SignalTable};
use log::{debug, warn};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

pub struct MemorySettings {
    values: RefCell<BTreeMap<String, SettingValue>>,
    handlers: SignalTable<String, ChangedCallback>,
}

impl MemorySettings {
    /// Store seeded with the schema defaults.
    pub fn new() -> Self {
        Self::with_values(defaults())
    }

    pub fn with_values(values: BTreeMap<String, SettingValue>) -> Self {
        Self {
            values: RefCell::new(values),
            handlers: SignalTable::new(),
        }
    }

    pub fn set_boolean(&self, key: &str, value: bool) -> bool {
        self.set(key, SettingValue::Boolean(value))
    }

    pub fn set_string(&self, key: &str, value: impl Into<String>) -> bool {
        self.set(key, SettingValue::String(value.into()))
    }

    /// Store a value and notify `changed::<key>` listeners.
    /// Returns false (and notifies nobody) when the value is unchanged.
    pub fn set(&self, key: &str, value: SettingValue) -> bool {
        {
            let mut values = self.values.borrow_mut();
            if values.get(key) == Some(&value) {
                return false;
            }
            debug!("Setting {} = {:?}", key, value);
            values.insert(key.to_string(), value);
        }

        self.emit_changed(key);
        true
    }

    /// Replace the whole value set, notifying every key that changed.
    /// Keys missing from `values` are left untouched.
    pub fn apply(&self, values: BTreeMap<String, SettingValue>) -> Vec<String> {
        let mut changed = Vec::new();
        for (key, value) in values {
            if self.set(&key, value) {
                changed.push(key);
            }
        }
        changed
    }

    /// Snapshot of every stored value.
    pub fn values(&self) -> BTreeMap<String, SettingValue> {
        self.values.borrow().clone()
    }

    /// Number of connected change callbacks (all keys).
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    fn emit_changed(&self, key: &str) {
        // Snapshot first: callbacks may connect/disconnect while running.
        for handler in self.handlers.snapshot(&key.to_string()) {
            handler(self, key);
        }
    }
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore for MemorySettings {
    fn get_boolean(&self, key: &str) -> bool {
        match self.values.borrow().get(key) {
            Some(SettingValue::Boolean(value)) => *value,
            Some(other) => {
                warn!("Setting {} is not a boolean: {:?}", key, other);
                false
            }
            None => false,
        }
    }

    fn get_string(&self, key: &str) -> String {
        match self.values.borrow().get(key) {
            Some(SettingValue::String(value)) => value.clone(),
            Some(other) => {
                warn!("Setting {} is not a string: {:?}", key, other);
                String::new()
            }
            None => String::new(),
        }
    }

    fn connect_changed(&self, key: &str, callback: Box<ChangedCallback>) -> HandlerId {
        self.handlers.connect(key.to_string(), Rc::from(callback))
    }

    fn disconnect(&self, id: HandlerId) {
        if !self.handlers.disconnect(id) {
            debug!("Settings handler {:?} was not connected", id);
        }
    }
}
