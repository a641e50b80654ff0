//! Replay host configuration.

use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use shareguard_classifier::ClassifierConfig;

/// Configuration for the `shareguard` binary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct ShareguardConfig {
    /// Users exempt from the share requirement when buddy bypass is on.
    pub(crate) buddies: Vec<String>,

    /// Persistent state locations.
    pub(crate) storage: StorageConfig,

    /// Classification thresholds and enforcement switches.
    pub(crate) classifier: ClassifierConfig,
}

/// Locations of persisted state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct StorageConfig {
    /// JSON array of confirmed leechers.
    pub(crate) leechers_file: PathBuf,
    /// JSON object of blocked IP addresses.
    pub(crate) ip_block_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            leechers_file: PathBuf::from("state/leechers.json"),
            ip_block_file: PathBuf::from("state/ipblocklist.json"),
        }
    }
}

impl ShareguardConfig {
    /// Load from `path`, or defaults if no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .wrap_err_with(|| format!("failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    pub(crate) fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
