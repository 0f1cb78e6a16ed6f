//! Caplet Configuration
//!
//! Handles parsing and management of caplet.toml configuration files.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::capsule::DEFAULT_MAX_CAPSULES;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file not found: {0}")]
    NotFound(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Root configuration structure matching caplet.toml.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CapletConfig {
    /// Capsule table settings
    #[serde(default)]
    pub table: TableConfig,
}

impl CapletConfig {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        let config: CapletConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from the current directory or parents.
    pub fn load_from_cwd() -> ConfigResult<Self> {
        let cwd = std::env::current_dir().map_err(ConfigError::Io)?;
        Self::find_and_load(&cwd)
    }

    /// Find and load configuration by searching up from the given directory.
    pub fn find_and_load(start_dir: &Path) -> ConfigResult<Self> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let config_path = dir.join("caplet.toml");
            if config_path.exists() {
                return Self::load(&config_path);
            }
            if !dir.pop() {
                // Reached root without finding config
                return Ok(Self::default());
            }
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// Capsule table settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    /// Maximum number of simultaneously live capsules
    #[serde(default = "default_max_capsules")]
    pub max_capsules: usize,

    /// Log a warning when the table is dropped with capsules still live
    #[serde(default = "default_warn_on_teardown")]
    pub warn_on_teardown: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            max_capsules: default_max_capsules(),
            warn_on_teardown: default_warn_on_teardown(),
        }
    }
}

fn default_max_capsules() -> usize {
    DEFAULT_MAX_CAPSULES
}

fn default_warn_on_teardown() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CapletConfig::default();
        assert_eq!(config.table.max_capsules, DEFAULT_MAX_CAPSULES);
        assert!(config.table.warn_on_teardown);
    }

    #[test]
    fn test_parse_table_section() {
        let config: CapletConfig = toml::from_str(
            r#"
            [table]
            max_capsules = 64
            warn_on_teardown = false
            "#,
        )
        .unwrap();
        assert_eq!(config.table.max_capsules, 64);
        assert!(!config.table.warn_on_teardown);
    }

    #[test]
    fn test_parse_partial_section() {
        let config: CapletConfig = toml::from_str(
            r#"
            [table]
            max_capsules = 128
            "#,
        )
        .unwrap();
        assert_eq!(config.table.max_capsules, 128);
        assert!(config.table.warn_on_teardown);
    }

    #[test]
    fn test_parse_empty() {
        let config: CapletConfig = toml::from_str("").unwrap();
        assert_eq!(config.table.max_capsules, DEFAULT_MAX_CAPSULES);
    }
}
