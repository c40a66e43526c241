use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dialog: DialogConfig,

    #[serde(default)]
    pub settings: SettingsConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogConfig {
    /// Seconds a status message stays visible
    #[serde(default = "default_status_timeout")]
    pub status_timeout: u64,

    /// Ask for y/n before deleting a session
    #[serde(default = "default_confirm_delete")]
    pub confirm_delete: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsConfig {
    /// Session store file
    #[serde(default = "default_settings_path")]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log file; the terminal belongs to the dialog
    #[serde(default = "default_log_file")]
    pub file: String,

    /// Level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_status_timeout() -> u64 {
    3
}

fn default_confirm_delete() -> bool {
    true
}

fn default_settings_path() -> String {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sessman")
        .join("sessions.toml")
        .to_string_lossy()
        .into_owned()
}

fn default_log_file() -> String {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sessman")
        .join("sessman.log")
        .to_string_lossy()
        .into_owned()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            status_timeout: default_status_timeout(),
            confirm_delete: default_confirm_delete(),
        }
    }
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            path: default_settings_path(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load config from file, or return defaults if file doesn't exist
    pub fn load(path: &str) -> Result<Self> {
        let expanded_path = expand_tilde(path);

        if !expanded_path.exists() {
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(&expanded_path).context("Failed to read config file")?;

        toml::from_str(&contents).context("Failed to parse config file")
    }

    pub fn settings_path(&self) -> PathBuf {
        expand_tilde(&self.settings.path)
    }

    pub fn log_path(&self) -> PathBuf {
        expand_tilde(&self.log.file)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
