//! Settings service: the JSON file on disk feeding the live store.
//!
//! The watcher runs on notify's thread and only posts
//! [`HostEvent::SettingsChanged`]; the UI loop calls [`SettingsService::reload`],
//! which pushes the diff into the in-memory store so only keys whose value
//! really changed notify their modules.

use crate::event_bus::{self, HostEvent};
use capy_tweaks::settings::{self, SettingValue, SettingsFile};
use capy_tweaks::{MemorySettings, TweaksError};
use log::{info, warn};
use notify::RecommendedWatcher;
use std::path::PathBuf;
use std::rc::Rc;

pub struct SettingsService {
    file: SettingsFile,
    store: Rc<MemorySettings>,
    watcher: Option<RecommendedWatcher>,
}

impl SettingsService {
    /// Load the settings at `path` (or the default location).
    /// An unreadable file is reported and the defaults are used.
    pub fn open(path: Option<PathBuf>) -> Result<Self, TweaksError> {
        let path = match path {
            Some(path) => path,
            None => SettingsFile::default_path()?,
        };
        let file = SettingsFile::new(path);

        let values = file.load().unwrap_or_else(|e| {
            warn!("Failed to load {:?}: {}, using defaults", file.path(), e);
            settings::defaults()
        });

        Ok(Self {
            file,
            store: Rc::new(MemorySettings::with_values(values)),
            watcher: None,
        })
    }

    pub fn store(&self) -> Rc<MemorySettings> {
        self.store.clone()
    }

    /// Start watching the file. Changes arrive as `HostEvent::SettingsChanged`.
    pub fn watch(&mut self) -> Result<(), TweaksError> {
        if self.watcher.is_some() {
            return Ok(());
        }
        let watcher = self
            .file
            .watch(|| event_bus::send(HostEvent::SettingsChanged))?;
        self.watcher = Some(watcher);
        Ok(())
    }

    /// Re-read the file and apply what changed. Keeps the current values if
    /// the file can't be parsed (e.g. caught mid-write).
    pub fn reload(&self) -> Vec<String> {
        match self.file.load() {
            Ok(values) => {
                let changed = self.store.apply(values);
                if !changed.is_empty() {
                    info!("Settings changed: {}", changed.join(", "));
                }
                changed
            }
            Err(e) => {
                warn!("Keeping previous settings, reload failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Parse, store and persist a single value.
    pub fn set(&self, key: &str, raw: &str) -> Result<SettingValue, TweaksError> {
        let value = settings::parse_value(key, raw)?;
        self.store.set(key, value.clone());
        self.file.save(&self.store.values())?;
        info!("Saved {} = {:?} to {:?}", key, value, self.file.path());
        Ok(value)
    }
}
