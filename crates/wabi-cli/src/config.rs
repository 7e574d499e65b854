//! CLI configuration management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use wabi::CoderConfig;

use crate::CliError;

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Reject dirty padding and out-of-range words when decoding
    #[serde(default = "default_strict")]
    pub strict: bool,
    /// Maximum nesting depth of decoded values
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Default log filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_strict() -> bool {
    true
}

fn default_max_depth() -> usize {
    wabi::abi::MAX_TYPE_DEPTH
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strict: default_strict(),
            max_depth: default_max_depth(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".wabi"))
    }

    /// Get the default config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load config from `path` (or the default location)
    ///
    /// A missing file yields the defaults; an unreadable or malformed one is an error.
    pub fn try_load(path: Option<&Path>) -> Result<Self, CliError> {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::config_path) else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        Self::parse(&content).map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse a TOML config; missing keys take their defaults
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Save config to `path` (or the default location)
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf, std::io::Error> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(Self::config_path)
            .ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::NotFound, "Cannot determine config path")
            })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;

        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Coder settings derived from this config
    pub fn coder_config(&self) -> CoderConfig {
        CoderConfig {
            strict: self.strict,
            max_depth: self.max_depth,
        }
    }
}
