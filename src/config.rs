use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::compare_engine::CompareOptions;
use crate::diagnostics::DEFAULT_MAX_LOG_LINES;
use crate::input_validation::{validate_listing_timeout_ms, validate_parallel_listings, validate_path_argument};
use crate::path_validation::sanitize_path;

/// Settings read from a YAML file. Every field is optional.
///
/// ```yaml
/// folders:
///   - /Volumes/CARD_A/DCIM
///   - "/Volumes/CARD B/DCIM"
/// listing_timeout_ms: 5000
/// max_parallel_listings: 4
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CompareConfig {
    pub folders: Vec<String>,
    pub listing_timeout_ms: Option<u64>,
    pub max_parallel_listings: usize,
    pub max_log_lines: usize,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            folders: Vec::new(),
            listing_timeout_ms: None,
            max_parallel_listings: CompareOptions::default().max_parallel_listings,
            max_log_lines: DEFAULT_MAX_LOG_LINES,
        }
    }
}

impl CompareConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to the defaults.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut config: Self = serde_yaml::from_str(raw)?;
        config.folders = config.folders.iter().map(|f| sanitize_path(f)).collect();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for folder in &self.folders {
            validate_path_argument(folder)?;
        }

        if let Some(timeout_ms) = self.listing_timeout_ms {
            validate_listing_timeout_ms(timeout_ms)?;
        }

        validate_parallel_listings(self.max_parallel_listings)?;

        if self.max_log_lines == 0 {
            anyhow::bail!("max_log_lines must be at least 1");
        }

        Ok(())
    }

    pub fn compare_options(&self) -> CompareOptions {
        CompareOptions {
            listing_timeout: self.listing_timeout_ms.map(Duration::from_millis),
            max_parallel_listings: self.max_parallel_listings,
        }
    }
}
