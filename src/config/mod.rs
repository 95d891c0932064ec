//! Persisted companion settings
//!
//! The settings file is owned by the settings dialog; this crate only reads it.
//! Location: `<platform config dir>/jeveassets-companion/config.json`
//! - Linux: `~/.config/jeveassets-companion/config.json`
//! - macOS: `~/Library/Application Support/jeveassets-companion/config.json`
//! - Windows: `%APPDATA%\jeveassets-companion\config.json`

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration as StdDuration;

use anyhow::{Context, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::evaluator::DEFAULT_WARN_DAYS;

const APP_DIR: &str = "jeveassets-companion";
const CONFIG_FILENAME: &str = "config.json";

/// Largest accepted `warn_days` (about a century)
pub const MAX_WARN_DAYS: i64 = 36_500;

/// Largest accepted `reminder_hours` (one year)
pub const MAX_REMINDER_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Staleness threshold in days
    pub warn_days: i64,
    /// Seconds between background checks
    pub check_interval: u64,
    /// Hours before a still-stale owner is alerted again
    pub reminder_hours: i64,
    /// Data directory override; empty means default resolution
    pub data_dir: String,
    /// Count owners without a timestamp as failures
    pub unknown_is_stale: bool,
    /// Per-store open/read bound in milliseconds
    pub store_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            warn_days: DEFAULT_WARN_DAYS,
            check_interval: 3600,
            reminder_hours: 24,
            data_dir: String::new(),
            unknown_is_stale: false,
            store_timeout_ms: 5000,
        }
    }
}

impl Settings {
    pub fn threshold(&self) -> Duration {
        Duration::days(self.warn_days.clamp(0, MAX_WARN_DAYS))
    }

    pub fn reminder_interval(&self) -> Duration {
        Duration::hours(self.reminder_hours.clamp(1, MAX_REMINDER_HOURS))
    }

    pub fn check_interval(&self) -> StdDuration {
        StdDuration::from_secs(self.check_interval.max(1))
    }

    pub fn store_timeout(&self) -> StdDuration {
        StdDuration::from_millis(self.store_timeout_ms)
    }

    /// Configured data directory, if one is set
    pub fn data_dir_override(&self) -> Option<PathBuf> {
        let trimmed = self.data_dir.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }
}

/// Path of the settings file, if the platform has a config directory
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILENAME))
}

/// Load settings from the default location, falling back to defaults
pub fn load_settings() -> Settings {
    match config_path() {
        Some(path) => load_settings_from(&path),
        None => {
            debug!("no platform config directory, using default settings");
            Settings::default()
        }
    }
}

/// Load settings from `path`
///
/// A missing file yields defaults silently; an unreadable or malformed file
/// yields defaults with a warning.
pub fn load_settings_from(path: &Path) -> Settings {
    if !path.exists() {
        debug!(path = %path.display(), "settings file not found, using defaults");
        return Settings::default();
    }

    match read_settings(path) {
        Ok(settings) => settings.within_bounds(path),
        Err(e) => {
            warn!("Ignoring settings file {}: {:#}", path.display(), e);
            Settings::default()
        }
    }
}

impl Settings {
    /// Reset out-of-range durations to their defaults
    fn within_bounds(mut self, path: &Path) -> Self {
        let defaults = Settings::default();
        if !(0..=MAX_WARN_DAYS).contains(&self.warn_days) {
            warn!(
                "Ignoring warn_days {} in {}: must be 0..={}",
                self.warn_days,
                path.display(),
                MAX_WARN_DAYS
            );
            self.warn_days = defaults.warn_days;
        }
        if !(1..=MAX_REMINDER_HOURS).contains(&self.reminder_hours) {
            warn!(
                "Ignoring reminder_hours {} in {}: must be 1..={}",
                self.reminder_hours,
                path.display(),
                MAX_REMINDER_HOURS
            );
            self.reminder_hours = defaults.reminder_hours;
        }
        self
    }
}

fn read_settings(path: &Path) -> Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
    serde_json::from_str(&raw).context("Failed to parse settings JSON")
}
