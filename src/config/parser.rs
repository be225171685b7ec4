//! Configuration parsing from CLI arguments and environment variables

use crate::{cli::Cli, config::env::EnvManager, error::Result, models::Config};
use std::path::PathBuf;

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
    env_file: PathBuf,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            env_file: PathBuf::from(".env"),
        }
    }

    /// Read dotenv values from `path` instead of `./.env`
    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.env_file = path.into();
        self
    }

    /// Build the configuration: defaults, .env, environment, CLI, then validate
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        EnvManager::load_env_file_from(&self.env_file)?;
        config.merge_from_env()?;
        self.apply_cli_overrides(&mut config);

        config.validate()?;
        Ok(config)
    }

    fn apply_cli_overrides(&self, config: &mut Config) {
        if let Some(repeats) = self.cli.repeats {
            config.repeats = repeats;
        }
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// One-line-per-setting summary for debug logging
pub fn display_config_summary(config: &Config) -> String {
    let timeout = match config.timeout() {
        Some(limit) => format!("{}s", limit.as_secs()),
        None => "none".to_string(),
    };

    [
        format!("Repeats: {}", config.repeats),
        format!("Timeout: {}", timeout),
        format!("Color Output: {}", config.enable_color),
        format!("Log Level: {}", config.log_level.as_str()),
        format!("Log Format: {:?}", config.log_format),
    ]
    .join("\n")
}
