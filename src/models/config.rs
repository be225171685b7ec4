//! Configuration data model and validation

use crate::error::{AppError, Result};
use crate::logging::{LogFormat, LogLevel};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Number of probe rounds per region
    #[serde(default = "default_repeats")]
    pub repeats: u32,

    /// Per-probe timeout in seconds; 0 leaves probes unbounded
    #[serde(default)]
    pub timeout_seconds: u64,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Minimum level for diagnostic log lines
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,

    /// Diagnostic log line format
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repeats: default_repeats(),
            timeout_seconds: 0,
            enable_color: default_enable_color(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-probe timeout, `None` when probes may block indefinitely
    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.repeats == 0 {
            return Err(AppError::config("Repeats must be at least 1"));
        }

        if self.timeout_seconds > crate::defaults::MAX_TIMEOUT_SECONDS {
            return Err(AppError::config(format!(
                "Timeout cannot exceed {} seconds",
                crate::defaults::MAX_TIMEOUT_SECONDS
            )));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(repeats) = std::env::var("AWSPING_REPEATS") {
            self.repeats = repeats.trim().parse::<u32>().map_err(|e| {
                AppError::config(format!("Invalid AWSPING_REPEATS value '{}': {}", repeats, e))
            })?;
        }

        if let Ok(timeout) = std::env::var("AWSPING_TIMEOUT_SECONDS") {
            self.timeout_seconds = timeout.trim().parse::<u64>().map_err(|e| {
                AppError::config(format!("Invalid AWSPING_TIMEOUT_SECONDS value '{}': {}", timeout, e))
            })?;
        }

        if let Ok(enable_color) = std::env::var("AWSPING_ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse::<bool>().map_err(|e| {
                AppError::config(format!("Invalid AWSPING_ENABLE_COLOR value '{}': {}", enable_color, e))
            })?;
        }

        if let Ok(level) = std::env::var("AWSPING_LOG_LEVEL") {
            self.log_level = level.parse::<LogLevel>().map_err(|e| {
                AppError::config(format!("Invalid AWSPING_LOG_LEVEL value '{}': {}", level, e))
            })?;
        }

        if let Ok(format) = std::env::var("AWSPING_LOG_FORMAT") {
            self.log_format = format.parse::<LogFormat>().map_err(|e| {
                AppError::config(format!("Invalid AWSPING_LOG_FORMAT value '{}': {}", format, e))
            })?;
        }

        Ok(())
    }
}

fn default_repeats() -> u32 {
    crate::defaults::DEFAULT_REPEATS
}

fn default_enable_color() -> bool {
    crate::defaults::supports_color()
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_format() -> LogFormat {
    LogFormat::Console
}
