//! Project Configuration (pushdown.toml)
//!
//! Handles project-level configuration stored in `pushdown.toml` at the project root.

use crate::{validate_format, validate_grammar, ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Project configuration from pushdown.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Engine limits and tracing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<EngineConfig>,

    /// CLI defaults
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cli: Option<CliConfig>,

    /// Logging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<LogConfig>,
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Deepest frame the engine may create (root is depth 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,

    /// Emit a trace event for every navigator step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_frames: Option<bool>,
}

/// CLI defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Grammar used when `--grammar` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grammar: Option<String>,

    /// Output format ("text" or "json")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Filter directive, e.g. "warn" or "pushdown::stack=trace"
    pub level: String,
}

impl ProjectConfig {
    /// Load project configuration from a file
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

    /// Validate the project configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(engine) = &self.engine {
            if engine.max_depth == Some(0) {
                return Err(ConfigError::InvalidValue {
                    field: "engine.max_depth".to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
        }

        if let Some(cli) = &self.cli {
            if let Some(grammar) = &cli.grammar {
                validate_grammar("cli.grammar", grammar)?;
            }
            if let Some(format) = &cli.format {
                validate_format("cli.format", format)?;
            }
        }

        if let Some(log) = &self.log {
            if log.level.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "log.level".to_string(),
                    reason: "level cannot be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Get the configured depth limit, if present
    pub fn max_depth(&self) -> Option<usize> {
        self.engine.as_ref().and_then(|e| e.max_depth)
    }

    /// Whether per-step frame tracing is enabled
    pub fn trace_frames(&self) -> Option<bool> {
        self.engine.as_ref().and_then(|e| e.trace_frames)
    }

    /// Get the default grammar, if present
    pub fn grammar(&self) -> Option<&str> {
        self.cli.as_ref().and_then(|c| c.grammar.as_deref())
    }

    /// Get the output format, if present
    pub fn format(&self) -> Option<&str> {
        self.cli.as_ref().and_then(|c| c.format.as_deref())
    }

    /// Get the log filter, if present
    pub fn log_level(&self) -> Option<&str> {
        self.log.as_ref().map(|l| l.level.as_str())
    }
}
