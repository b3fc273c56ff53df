//! Configuration management for roster.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use chrono::TimeDelta;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::notify::ToastQueue;
use crate::render::OutputFormat;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "roster";

/// Environment variable prefix; nested keys are separated by `__`.
const ENV_PREFIX: &str = "ROSTER_";

/// Longest accepted notification display time (one day).
pub const MAX_DISPLAY_SECS: u64 = 86_400;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `ROSTER_`, e.g.
///    `ROSTER_NOTIFICATIONS__CAPACITY=5`)
/// 2. TOML config file at `~/.config/roster/config.toml`
/// 3. Default values
///
/// The group list is fixed and deliberately absent from configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Notification configuration.
    pub notifications: NotificationConfig,
    /// Table rendering configuration.
    pub display: DisplayConfig,
    /// Interactive shell configuration.
    pub shell: ShellConfig,
}

/// Notification-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// How many recent notifications stay in the queue.
    pub capacity: usize,
    /// How long a notification stays visible, in seconds.
    pub display_secs: u64,
}

/// Rendering-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Output format used when `--format` is not given.
    pub format: OutputFormat,
    /// Show the short id column in tables.
    pub show_ids: bool,
}

/// Shell-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Prompt printed before each line in interactive mode.
    pub prompt: String,
    /// Echo each script line before executing it.
    pub echo_commands: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            capacity: 3,
            display_secs: 5,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            show_ids: true,
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "roster> ".to_string(),
            echo_commands: false,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.notifications.capacity == 0 {
            return Err(Error::ConfigValidation {
                message: "notifications.capacity must be greater than 0".to_string(),
            });
        }

        if self.notifications.display_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "notifications.display_secs must be greater than 0".to_string(),
            });
        }

        if self.notifications.display_secs > MAX_DISPLAY_SECS {
            return Err(Error::ConfigValidation {
                message: format!(
                    "notifications.display_secs ({}) is too large (max {MAX_DISPLAY_SECS})",
                    self.notifications.display_secs
                ),
            });
        }

        if self.shell.prompt.contains('\n') {
            return Err(Error::ConfigValidation {
                message: "shell.prompt must be a single line".to_string(),
            });
        }

        Ok(())
    }

    /// Get the notification display duration.
    #[must_use]
    pub fn display_duration(&self) -> TimeDelta {
        let secs = i64::try_from(self.notifications.display_secs).unwrap_or(i64::MAX);
        TimeDelta::try_seconds(secs).unwrap_or(TimeDelta::MAX)
    }

    /// Build the notification queue described by this configuration.
    #[must_use]
    pub fn toast_queue(&self) -> ToastQueue {
        ToastQueue::new(self.notifications.capacity, self.display_duration())
    }
}
