//! Settings boundary.
//!
//! Modules only read settings; writes come from the settings UI or from the
//! settings file being edited. Values are booleans (module toggles) or strings
//! (corner colors).

mod file;
mod memory;

pub use file::SettingsFile;
pub use memory::MemorySettings;

use crate::color::Color;
use crate::error::TweaksError;
use crate::signal::HandlerId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Callback for `changed::<key>`; receives the store and the key that changed.
pub type ChangedCallback = dyn Fn(&dyn SettingsStore, &str);

/// Key → typed value store with per-key change notification.
pub trait SettingsStore {
    /// Value of a boolean key; unknown keys and type mismatches read as `false`.
    fn get_boolean(&self, key: &str) -> bool;

    /// Value of a string key; unknown keys and type mismatches read as empty.
    fn get_string(&self, key: &str) -> String;

    /// Register a callback fired after `key` changes value.
    fn connect_changed(&self, key: &str, callback: Box<ChangedCallback>) -> HandlerId;

    fn disconnect(&self, id: HandlerId);
}

/// A single stored value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Boolean(bool),
    String(String),
}

impl SettingValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Boolean(value) => Some(*value),
            SettingValue::String(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::String(value) => Some(value),
            SettingValue::Boolean(_) => None,
        }
    }

    /// Whether both values carry the same type.
    pub fn same_type(&self, other: &SettingValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Setting keys understood by the built-in modules.
pub mod keys {
    pub const SCREEN_CORNERS: &str = "screen-corners";
    pub const PANEL_CORNERS: &str = "panel-corners";
    pub const WORKSPACE_WRAPAROUND: &str = "workspace-wraparound";
    pub const CLICK_TO_CLOSE_OVERVIEW: &str = "click-to-close-overview";
    pub const NO_WINDOW_READY_NOTIFICATIONS: &str = "no-window-ready-notifications";
    pub const NO_FAVORITE_NOTIFICATIONS: &str = "no-favorite-notifications";

    pub const PANEL_CORNERS_LEFT_COLOR: &str = "panel-corners-left-color";
    pub const PANEL_CORNERS_RIGHT_COLOR: &str = "panel-corners-right-color";

    /// Every module toggle, in registration order.
    pub const TOGGLES: [&str; 6] = [
        SCREEN_CORNERS,
        PANEL_CORNERS,
        WORKSPACE_WRAPAROUND,
        CLICK_TO_CLOSE_OVERVIEW,
        NO_WINDOW_READY_NOTIFICATIONS,
        NO_FAVORITE_NOTIFICATIONS,
    ];

    pub const DEFAULT_CORNER_COLOR: &str = "#000000ff";
}

/// Schema defaults: every toggle off, both corner colors opaque black.
pub fn defaults() -> BTreeMap<String, SettingValue> {
    let mut values = BTreeMap::new();
    for key in keys::TOGGLES {
        values.insert(key.to_string(), SettingValue::Boolean(false));
    }
    for key in [keys::PANEL_CORNERS_LEFT_COLOR, keys::PANEL_CORNERS_RIGHT_COLOR] {
        values.insert(
            key.to_string(),
            SettingValue::String(keys::DEFAULT_CORNER_COLOR.to_string()),
        );
    }
    values
}

/// Parse a value typed on the command line for `key`, checked against the
/// key's schema type. Color keys must hold a parsable color.
pub fn parse_value(key: &str, raw: &str) -> Result<SettingValue, TweaksError> {
    let invalid = || TweaksError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
    };

    match defaults().get(key) {
        Some(SettingValue::Boolean(_)) => match raw.trim() {
            "true" | "on" | "1" => Ok(SettingValue::Boolean(true)),
            "false" | "off" | "0" => Ok(SettingValue::Boolean(false)),
            _ => Err(invalid()),
        },
        Some(SettingValue::String(_)) => {
            raw.parse::<Color>().map_err(|_| invalid())?;
            Ok(SettingValue::String(raw.trim().to_string()))
        }
        None => Err(TweaksError::UnknownSetting(key.to_string())),
    }
}
