//! Error types for capy-tweaks

/// Errors raised by the settings backend and value parsing.
///
/// None of these reach the user: callers fall back to defaults and log.
#[derive(Debug, thiserror::Error)]
pub enum TweaksError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Invalid color: {0:?}")]
    InvalidColor(String),

    #[error("Unknown setting: {0}")]
    UnknownSetting(String),

    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },

    #[error("No config directory available")]
    NoConfigDir,
}
