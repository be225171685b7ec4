//! .env file loading

use crate::error::{AppError, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load a dotenv file; variables already set in the process win.
    ///
    /// Returns whether a file was found and loaded.
    pub fn load_env_file_from(path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }

        dotenv::from_path(path).map_err(|e| {
            AppError::config(format!("Failed to load {}: {}", path.display(), e))
        })?;
        Ok(true)
    }
}
