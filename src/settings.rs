//! Session settings store — profiles persisted in a TOML file
//!
//! The dialog only reads names from a [`SettingsProvider`]; the store is
//! also the place where the dialog's notifications are made permanent.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::dialog::naming::{is_default, DEFAULT_SESSION};
use crate::dialog::SessionEvent;
use crate::error::{Result, SettingsError};

/// Read access to the session names known to the host application
pub trait SettingsProvider {
    /// All stored session names, in storage order
    fn session_names(&self) -> Vec<String>;

    /// Name of the session the application currently runs with
    fn current_session_name(&self) -> String;
}

/// Per-session terminal settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionProfile {
    #[serde(default = "default_device")]
    pub device: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Sent after each line: "lf", "cr" or "crlf"
    #[serde(default = "default_line_ending")]
    pub line_ending: String,

    #[serde(default)]
    pub local_echo: bool,
}

fn default_device() -> String {
    "/dev/ttyUSB0".to_string()
}

fn default_baud_rate() -> u32 {
    115_200
}

fn default_line_ending() -> String {
    "lf".to_string()
}

fn default_current() -> String {
    DEFAULT_SESSION.to_string()
}

impl Default for SessionProfile {
    fn default() -> Self {
        Self {
            device: default_device(),
            baud_rate: default_baud_rate(),
            line_ending: default_line_ending(),
            local_echo: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default = "default_current")]
    current: String,

    #[serde(default)]
    sessions: BTreeMap<String, SessionProfile>,
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            current: default_current(),
            sessions: BTreeMap::new(),
        }
    }
}

/// TOML-backed collection of named session profiles.
///
/// "Default" always exists, whether or not it has a stored profile.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
    data: StoreFile,
}

impl SessionStore {
    /// Load the store, or start empty if the file doesn't exist
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            debug!(path = %path.display(), "no settings file, starting empty");
            return Ok(Self {
                path,
                data: StoreFile::default(),
            });
        }

        let contents = fs::read_to_string(&path).map_err(|source| SettingsError::Io {
            path: path.clone(),
            source,
        })?;
        let data = toml::from_str(&contents).map_err(|source| SettingsError::Parse {
            path: path.clone(),
            source,
        })?;

        Ok(Self { path, data })
    }

    /// Write the store back to its file, creating parent directories
    pub fn save(&self) -> Result<()> {
        let contents = toml::to_string_pretty(&self.data)?;
        let io_err = |source: std::io::Error| SettingsError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        fs::write(&self.path, contents).map_err(io_err)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, name: &str) -> bool {
        is_default(name) || self.data.sessions.contains_key(name)
    }

    /// Profile for `name`; "Default" falls back to built-in defaults
    pub fn profile(&self, name: &str) -> Option<SessionProfile> {
        match self.data.sessions.get(name) {
            Some(profile) => Some(profile.clone()),
            None if is_default(name) => Some(SessionProfile::default()),
            None => None,
        }
    }

    pub fn switch(&mut self, name: &str) -> Result<()> {
        if !self.contains(name) {
            return Err(SettingsError::UnknownSession(name.to_string()));
        }
        self.data.current = name.to_string();
        Ok(())
    }

    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        if is_default(old) {
            return Err(SettingsError::DefaultSession);
        }
        self.check_new_name(new)?;
        let profile = self
            .data
            .sessions
            .remove(old)
            .ok_or_else(|| SettingsError::UnknownSession(old.to_string()))?;
        self.data.sessions.insert(new.to_string(), profile);

        if self.data.current == old {
            self.data.current = new.to_string();
        }
        Ok(())
    }

    pub fn clone_session(&mut self, source: &str, new: &str) -> Result<()> {
        let profile = self
            .profile(source)
            .ok_or_else(|| SettingsError::UnknownSession(source.to_string()))?;
        self.check_new_name(new)?;
        self.data.sessions.insert(new.to_string(), profile);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<()> {
        if is_default(name) {
            return Err(SettingsError::DefaultSession);
        }
        if self.data.sessions.remove(name).is_none() {
            return Err(SettingsError::UnknownSession(name.to_string()));
        }
        if self.data.current == name {
            self.data.current = default_current();
        }
        Ok(())
    }

    /// Make a dialog notification permanent in memory (call `save` after)
    pub fn apply(&mut self, event: &SessionEvent) -> Result<()> {
        debug!(?event, "applying session event");
        match event {
            SessionEvent::Switched { name } => {
                if !self.contains(name) {
                    self.data
                        .sessions
                        .insert(name.clone(), SessionProfile::default());
                }
                self.switch(name)
            }
            SessionEvent::Renamed { old, new } => self.rename(old, new),
            SessionEvent::Cloned { source, new } => self.clone_session(source, new),
            SessionEvent::Removed { name } => self.remove(name),
        }
    }

    fn check_new_name(&self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(SettingsError::EmptyName);
        }
        if self.contains(name) {
            return Err(SettingsError::DuplicateSession(name.to_string()));
        }
        Ok(())
    }
}

impl SettingsProvider for SessionStore {
    fn session_names(&self) -> Vec<String> {
        self.data.sessions.keys().cloned().collect()
    }

    fn current_session_name(&self) -> String {
        self.data.current.clone()
    }
}
