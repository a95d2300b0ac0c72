//! Settings error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading or parsing settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file exists but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The settings file is not valid JSON, or does not fit the settings shape.
    #[error("malformed settings in {}: {source}", path.display())]
    Json {
        /// File the bad JSON came from.
        path: PathBuf,
        /// Parser error, with line and column.
        source: serde_json::Error,
    },
    /// A settings value was invalid (e.g., wrong URL scheme).
    #[error("invalid settings value: {0}")]
    InvalidValue(String),
}

impl SettingsError {
    /// The settings file involved, when the error came from one.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Io { path, .. } | Self::Json { path, .. } => Some(path),
            Self::InvalidValue(_) => None,
        }
    }
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;
