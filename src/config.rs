//! Settings file handling
//!
//! Settings are a small JSON document. Every key is optional; missing keys
//! take their defaults, so an empty `{}` is a valid settings file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::controller::Timings;
use crate::types::Language;

/// Directory name under the platform data directory
pub const APP_DIR_NAME: &str = "regform";

/// Application settings that can be saved/loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where drafts, the language preference and the log file live
    pub data_dir: Option<PathBuf>,
    /// Language used when detection finds nothing better
    pub default_language: Language,
    pub validation_debounce_ms: u64,
    pub save_debounce_ms: u64,
    pub submit_delay_ms: u64,
    pub resize_throttle_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        let timings = Timings::default();
        Self {
            data_dir: None,
            default_language: Language::English,
            validation_debounce_ms: millis(timings.validation_debounce),
            save_debounce_ms: millis(timings.save_debounce),
            submit_delay_ms: millis(timings.submit_delay),
            resize_throttle_ms: millis(timings.resize_throttle),
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl Settings {
    /// Default location of the settings file, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join("settings.json"))
    }

    /// Save settings to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize settings to JSON")?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        fs::write(&path, json)
            .with_context(|| format!("Failed to write settings to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load settings from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings from {:?}", path.as_ref()))?;

        let settings: Self =
            serde_json::from_str(&content).context("Failed to parse settings JSON")?;

        Ok(settings)
    }

    /// Load from `path` when given, else from the default location when a
    /// file exists there, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from_file(path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.validation_debounce_ms > 10_000 {
            anyhow::bail!(
                "validation_debounce_ms must be at most 10000, got {}",
                self.validation_debounce_ms
            );
        }
        if self.save_debounce_ms > 60_000 {
            anyhow::bail!(
                "save_debounce_ms must be at most 60000, got {}",
                self.save_debounce_ms
            );
        }
        if self.submit_delay_ms > 60_000 {
            anyhow::bail!(
                "submit_delay_ms must be at most 60000, got {}",
                self.submit_delay_ms
            );
        }
        if self.resize_throttle_ms > 10_000 {
            anyhow::bail!(
                "resize_throttle_ms must be at most 10000, got {}",
                self.resize_throttle_ms
            );
        }
        if let Some(dir) = &self.data_dir {
            if dir.as_os_str().is_empty() {
                anyhow::bail!("data_dir must not be empty");
            }
            if dir.is_file() {
                anyhow::bail!("data_dir {:?} is a file", dir);
            }
        }
        Ok(())
    }

    /// Resolved data directory: the override, the configured directory, or
    /// the platform default
    pub fn data_dir(&self, data_dir_override: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = data_dir_override {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_local_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .context("Could not determine a data directory; pass --data-dir")
    }

    pub fn timings(&self) -> Timings {
        Timings {
            validation_debounce: Duration::from_millis(self.validation_debounce_ms),
            save_debounce: Duration::from_millis(self.save_debounce_ms),
            submit_delay: Duration::from_millis(self.submit_delay_ms),
            resize_throttle: Duration::from_millis(self.resize_throttle_ms),
        }
    }
}
