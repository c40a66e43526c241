use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the session settings store
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("session '{0}' not found")]
    UnknownSession(String),

    #[error("session '{0}' already exists")]
    DuplicateSession(String),

    #[error("the Default session cannot be renamed or removed")]
    DefaultSession,

    #[error("session name must not be empty")]
    EmptyName,
}

pub type Result<T> = std::result::Result<T, SettingsError>;
