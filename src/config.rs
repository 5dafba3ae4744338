//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every section and field is optional; an empty file is the default
//! configuration.
//!
//! ```toml
//! [pipes]
//! directory = "./Pipes"
//! blocking = false
//!
//! [frame]
//! rate_hz = 60
//! log_interval_frames = 600
//!
//! [recorder]
//! enabled = false
//! path = "./logs/reports.jsonl"
//!
//! [logging]
//! level = "info"
//! # dir = "./logs"
//! ```

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{PipeError, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub pipes: PipesConfig,
    #[serde(default)]
    pub frame: FrameConfig,
    #[serde(default)]
    pub recorder: RecorderConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Pipe discovery and read behavior
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PipesConfig {
    /// Directory scanned for FIFOs (Unix only)
    #[serde(default = "default_pipes_directory")]
    pub directory: String,

    /// Block each frame until every device has sent `FLUSH`
    #[serde(default)]
    pub blocking: bool,
}

/// Emulated frame loop
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FrameConfig {
    #[serde(default = "default_rate_hz")]
    pub rate_hz: u32,

    #[serde(default = "default_log_interval_frames")]
    pub log_interval_frames: u64,
}

/// JSONL pad report recording
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RecorderConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_recorder_path")]
    pub path: String,
}

/// Log output
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Directory for daily rolling log files; console only when unset
    #[serde(default)]
    pub dir: Option<String>,

    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_pipes_directory() -> String { "./Pipes".to_string() }

fn default_rate_hz() -> u32 { 60 }
fn default_log_interval_frames() -> u64 { 600 }

fn default_recorder_path() -> String { "./logs/reports.jsonl".to_string() }

fn default_log_level() -> String { "info".to_string() }

/// Frame rates the loop accepts.
const VALID_RATES_HZ: [u32; 4] = [30, 50, 60, 120];

/// Log levels accepted by `[logging] level`.
const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl Default for PipesConfig {
    fn default() -> Self {
        Self {
            directory: default_pipes_directory(),
            blocking: false,
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            rate_hz: default_rate_hz(),
            log_interval_frames: default_log_interval_frames(),
        }
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_recorder_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: None,
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pipe_controller::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    fn validate(&self) -> Result<()> {
        if self.pipes.directory.is_empty() {
            return Err(invalid("pipes directory cannot be empty"));
        }

        if !VALID_RATES_HZ.contains(&self.frame.rate_hz) {
            return Err(invalid("rate_hz must be one of: 30, 50, 60, 120"));
        }

        if self.frame.log_interval_frames == 0 {
            return Err(invalid("log_interval_frames must be greater than 0"));
        }

        if self.recorder.enabled && self.recorder.path.is_empty() {
            return Err(invalid("recorder path cannot be empty when enabled"));
        }

        if let Some(dir) = &self.logging.dir {
            if dir.is_empty() {
                return Err(invalid("logging dir cannot be empty when set"));
            }
        }

        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(invalid(format!(
                "log level must be one of: {}",
                VALID_LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }
}

fn invalid(message: impl std::fmt::Display) -> PipeError {
    PipeError::Config(toml::de::Error::custom(message))
}
