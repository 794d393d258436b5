//! # Configuration Management Module
//!
//! TOML-backed configuration for the roster tracker with validation,
//! defaults, and persistence. Sections:
//!
//! - `[tracker]` - display identity
//! - `[storage]` - data directory for the KV store and portrait files
//! - `[logging]` - level and optional log file
//! - `[reset]` - in-game rollover schedule (hour and weekly weekday)
//!
//! ```toml
//! [tracker]
//! name = "My Roster"
//!
//! [storage]
//! data_dir = "./data"
//!
//! [logging]
//! level = "info"
//!
//! [reset]
//! rollover_hour = 6
//! weekly_weekday = "wednesday"
//! ```
//!
//! Values are validated on load; an invalid schedule or empty data dir is a
//! hard error rather than a silent fallback.

use anyhow::{anyhow, Result};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::roster::reset::ResetSchedule;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Display name shown in status output.
    pub name: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            name: "My Roster".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file; console-only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetConfig {
    /// Hour (0-23) of the daily rollover.
    #[serde(default = "default_rollover_hour")]
    pub rollover_hour: u32,
    /// Weekday of the weekly rollover, e.g. "wednesday".
    #[serde(default = "default_weekly_weekday")]
    pub weekly_weekday: String,
}

fn default_rollover_hour() -> u32 {
    6
}

fn default_weekly_weekday() -> String {
    "wednesday".to_string()
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            rollover_hour: default_rollover_hour(),
            weekly_weekday: default_weekly_weekday(),
        }
    }
}

impl ResetConfig {
    /// Build the schedule used by the reconciliation pass.
    pub fn schedule(&self) -> Result<ResetSchedule> {
        if self.rollover_hour > 23 {
            return Err(anyhow!(
                "reset.rollover_hour must be 0-23, got {}",
                self.rollover_hour
            ));
        }
        let weekday: Weekday = self
            .weekly_weekday
            .parse()
            .map_err(|_| anyhow!("reset.weekly_weekday is not a weekday: {}", self.weekly_weekday))?;
        Ok(ResetSchedule {
            rollover_hour: self.rollover_hour,
            weekly_weekday: weekday,
        })
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tracker: TrackerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub reset: ResetConfig,
}

impl Config {
    /// Load and validate a configuration file.
    pub async fn load(path: &str) -> Result<Self> {
        let text = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("cannot read config {}: {}", path, e))?;
        let config: Config = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Persist the configuration back to disk.
    pub async fn save(&self, path: &str) -> Result<()> {
        let serialized = toml::to_string_pretty(self)?;
        fs::write(path, serialized).await?;
        Ok(())
    }

    /// Write a default configuration file.
    pub async fn create_default(path: &str) -> Result<Self> {
        let config = Config::default();
        config.save(path).await?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tracker.name.trim().is_empty() {
            return Err(anyhow!("tracker.name cannot be empty"));
        }
        if self.storage.data_dir.trim().is_empty() {
            return Err(anyhow!("storage.data_dir cannot be empty"));
        }
        match self.logging.level.to_ascii_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            other => return Err(anyhow!("logging.level is not a log level: {}", other)),
        }
        self.reset.schedule()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate_and_match_live_schedule() {
        let config = Config::default();
        config.validate().expect("defaults valid");
        let schedule = config.reset.schedule().expect("schedule");
        assert_eq!(schedule, ResetSchedule::default());
    }

    #[test]
    fn rejects_bad_schedule() {
        let mut config = Config::default();
        config.reset.rollover_hour = 24;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.reset.weekly_weekday = "someday".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let config: Config = toml::from_str("[tracker]\nname = \"Alt Army\"\n").expect("parse");
        assert_eq!(config.tracker.name, "Alt Army");
        assert_eq!(config.reset.rollover_hour, 6);
        config.validate().expect("valid");
    }

    #[test]
    fn rejects_unknown_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }
}
