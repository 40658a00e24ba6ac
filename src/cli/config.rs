//! Configuration file
//!
//! JSON, loaded once per command. Only `data_dir` is required.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::loader::DEFAULT_BATCH_SIZE;
use crate::query::{DEFAULT_MAX_PAGE_SIZE, DEFAULT_TOP_MAKES};

use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: String,

    /// Records per storage batch during loads
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Makes listed by `summary`
    #[serde(default = "default_top_makes_limit")]
    pub top_makes_limit: usize,

    /// Page size of `county` when none is given
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Largest accepted page size
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}
fn default_top_makes_limit() -> usize {
    DEFAULT_TOP_MAKES
}
fn default_page_size() -> usize {
    20
}
fn default_max_page_size() -> usize {
    DEFAULT_MAX_PAGE_SIZE
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        Self::from_json(&content)
    }

    /// Parse and validate configuration text
    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        if self.batch_size == 0 {
            return Err(CliError::config_error("batch_size must be > 0"));
        }

        if self.top_makes_limit == 0 {
            return Err(CliError::config_error("top_makes_limit must be > 0"));
        }

        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(CliError::config_error(format!(
                "default_page_size must be between 1 and max_page_size ({})",
                self.max_page_size
            )));
        }

        Ok(())
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }
}
