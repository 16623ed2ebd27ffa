//! Tracker configuration: compiled-in defaults, TOML file loading, validation.
//!
//! Configuration is read once at startup and immutable for the run. The
//! defaults match the original fixed symbol set; a TOML file or CLI flags may
//! replace them.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("no symbols configured")]
    NoSymbols,

    #[error("symbols may not be empty")]
    EmptySymbol,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),

    #[error("poll interval must be at least one second")]
    ZeroInterval,
}

/// Settings for one tracking run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Symbols polled each tick, in this order.
    pub symbols: Vec<String>,
    /// Seconds between ticks.
    pub interval_secs: u64,
    /// Directory for the log, manifest, and workbook.
    pub output_dir: PathBuf,
    /// Currency label shown on the workbook's price axis.
    pub currency: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            symbols: vec!["AAPL".into(), "TSLA".into(), "MSFT".into()],
            interval_secs: 60,
            output_dir: PathBuf::from("data"),
            currency: "USD".into(),
        }
    }
}

impl TrackerConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a config from a TOML string. Missing fields take the defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Startup validation: non-empty duplicate-free symbols, interval >= 1s.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.symbols.is_empty() {
            return Err(ConfigError::NoSymbols);
        }
        let mut seen = HashSet::new();
        for symbol in &self.symbols {
            if symbol.trim().is_empty() {
                return Err(ConfigError::EmptySymbol);
            }
            if !seen.insert(symbol.as_str()) {
                return Err(ConfigError::DuplicateSymbol(symbol.clone()));
            }
        }
        if self.interval_secs == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }
}
