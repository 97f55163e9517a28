//! JSON settings file with change watching.
//!
//! The file is a flat object of `"key": value` pairs. Anything missing falls
//! back to the schema defaults, so an empty or absent file is valid.

use super::{SettingValue, defaults};
use crate::error::TweaksError;
use log::{debug, info, warn};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "CapyTweaks";
const FILE_NAME: &str = "settings.json";

pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$XDG_CONFIG_HOME/CapyTweaks/settings.json`
    pub fn default_path() -> Result<PathBuf, TweaksError> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(FILE_NAME))
            .ok_or(TweaksError::NoConfigDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file merged over the defaults.
    ///
    /// Values whose type disagrees with the schema are dropped with a warning.
    pub fn load(&self) -> Result<BTreeMap<String, SettingValue>, TweaksError> {
        let mut values = defaults();

        if !self.path.exists() {
            debug!("No settings file at {:?}, using defaults", self.path);
            return Ok(values);
        }

        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(values);
        }

        let stored: BTreeMap<String, SettingValue> = serde_json::from_str(&contents)?;
        for (key, value) in stored {
            match values.get(&key) {
                Some(default) if !default.same_type(&value) => {
                    warn!("Ignoring setting {}: wrong type {:?}", key, value);
                }
                Some(_) => {
                    values.insert(key, value);
                }
                None => debug!("Unknown setting {} in {:?}", key, self.path),
            }
        }

        Ok(values)
    }

    pub fn save(&self, values: &BTreeMap<String, SettingValue>) -> Result<(), TweaksError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Watch the file and call `on_change` (from the watcher thread) whenever
    /// it is created, modified or removed. Drop the returned watcher to stop.
    ///
    /// The parent directory is watched rather than the file itself so editors
    /// that replace the file atomically keep triggering reloads.
    pub fn watch<F>(&self, on_change: F) -> Result<RecommendedWatcher, TweaksError>
    where
        F: Fn() + Send + 'static,
    {
        let dir = self
            .path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&dir)?;

        let file_name = self.path.file_name().map(|name| name.to_os_string());

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            match res {
                Ok(event) => {
                    let relevant = matches!(
                        event.kind,
                        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
                    );
                    let ours = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                    if relevant && ours {
                        on_change();
                    }
                }
                Err(e) => warn!("Settings watcher error: {}", e),
            }
        })?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        info!("Watching settings file {:?}", self.path);

        Ok(watcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::keys;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let file = SettingsFile::new(dir.path().join("settings.json"));
        assert_eq!(file.load().unwrap(), defaults());
    }

    #[test]
    fn test_partial_file_merges_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r##"{"screen-corners": true, "panel-corners-right-color": "#ff0000"}"##,
        )
        .unwrap();

        let values = SettingsFile::new(&path).load().unwrap();
        assert_eq!(values[keys::SCREEN_CORNERS], SettingValue::Boolean(true));
        assert_eq!(values[keys::PANEL_CORNERS], SettingValue::Boolean(false));
        assert_eq!(
            values[keys::PANEL_CORNERS_RIGHT_COLOR].as_str(),
            Some("#ff0000")
        );
    }

    #[test]
    fn test_wrong_type_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"screen-corners": "on", "mystery": "x"}"#).unwrap();

        let values = SettingsFile::new(&path).load().unwrap();
        assert_eq!(values[keys::SCREEN_CORNERS], SettingValue::Boolean(false));
        assert!(!values.contains_key("mystery"));
    }

    #[test]
    fn test_unparsable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"screen-corners": 1"#).unwrap();

        assert!(matches!(
            SettingsFile::new(&path).load(),
            Err(TweaksError::Json(_))
        ));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let file = SettingsFile::new(dir.path().join("nested").join("settings.json"));
        let mut values = defaults();
        values.insert(keys::WORKSPACE_WRAPAROUND.into(), SettingValue::Boolean(true));

        file.save(&values).unwrap();
        assert_eq!(file.load().unwrap(), values);
    }
}
