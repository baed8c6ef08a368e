//! Global Configuration (~/.pushdown/config.toml)
//!
//! Handles user-level configuration stored in `~/.pushdown/config.toml`.

use crate::project::LogConfig;
use crate::{validate_format, validate_grammar, ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global user configuration from ~/.pushdown/config.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct GlobalConfig {
    /// Default settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    /// Logging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<LogConfig>,
}

/// Default settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DefaultsConfig {
    /// Default grammar
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grammar: Option<String>,

    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl GlobalConfig {
    /// Load global configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the global configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(defaults) = &self.defaults {
            if let Some(grammar) = &defaults.grammar {
                validate_grammar("defaults.grammar", grammar)?;
            }
            if let Some(format) = &defaults.format {
                validate_format("defaults.format", format)?;
            }
        }
        Ok(())
    }

    /// Get the global config file path (~/.pushdown/config.toml)
    pub fn global_config_path() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".pushdown").join("config.toml"))
    }

    /// Get the default grammar
    pub fn default_grammar(&self) -> Option<&str> {
        self.defaults.as_ref().and_then(|d| d.grammar.as_deref())
    }

    /// Get the default output format
    pub fn default_format(&self) -> Option<&str> {
        self.defaults.as_ref().and_then(|d| d.format.as_deref())
    }

    /// Get the log filter
    pub fn log_level(&self) -> Option<&str> {
        self.log.as_ref().map(|l| l.level.as_str())
    }
}
