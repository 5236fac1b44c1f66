//! Configuration management
//!
//! Values come from the environment (a `.env` file is honoured) and can be
//! overridden by command-line flags.

use crate::error::{LoadError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Load Configuration Constants
// ============================================================================

/// Default directory for the run's output and error logs.
pub const DEFAULT_OUTPUT_DIR: &str = ".";

/// Default delay between pipeline completion and process exit, in milliseconds.
pub const DEFAULT_EXIT_GRACE_MS: u64 = 1000;

/// Load configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadConfig {
    /// Directory the run artifacts are created in
    pub output_dir: PathBuf,

    /// Delay before the process exits once the pipeline has completed
    pub exit_grace: Duration,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            exit_grace: Duration::from_millis(DEFAULT_EXIT_GRACE_MS),
        }
    }
}

impl LoadConfig {
    /// Load configuration from environment and defaults
    ///
    /// Environment variables:
    /// - `CATALOG_LOAD_OUTPUT_DIR`: directory for run artifacts
    /// - `CATALOG_LOAD_EXIT_GRACE_MS`: delay before exit, in milliseconds
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(dir) = std::env::var("CATALOG_LOAD_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }

        if let Ok(ms) = std::env::var("CATALOG_LOAD_EXIT_GRACE_MS") {
            let ms: u64 = ms.trim().parse().map_err(|_| {
                LoadError::config(format!("CATALOG_LOAD_EXIT_GRACE_MS must be a number of milliseconds, got '{}'", ms))
            })?;
            config.exit_grace = Duration::from_millis(ms);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(LoadError::config("output directory cannot be empty"));
        }

        if self.output_dir.exists() && !self.output_dir.is_dir() {
            return Err(LoadError::config(format!(
                "output directory '{}' is not a directory",
                self.output_dir.display()
            )));
        }

        Ok(())
    }
}
