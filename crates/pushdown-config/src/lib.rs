//! Pushdown Configuration System
//!
//! Provides configuration management for the pushdown engine and CLI:
//! - Project configuration (pushdown.toml)
//! - Global user configuration (~/.pushdown/config.toml)
//! - Configuration precedence and merging
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded and merged in the following order (later overrides earlier):
//! 1. Global config (~/.pushdown/config.toml)
//! 2. Project config (./pushdown.toml)
//! 3. Environment variables (PUSHDOWN_*)
//! 4. CLI flags
//!
//! # Example
//!
//! ```no_run
//! use pushdown_config::ConfigLoader;
//! use std::path::Path;
//!
//! let mut loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! println!("max depth: {:?}", config.max_depth());
//! ```

pub mod global;
pub mod loader;
pub mod project;

use std::path::PathBuf;
use thiserror::Error;

/// Name of the project configuration file
pub const PROJECT_CONFIG_FILE: &str = "pushdown.toml";

/// Grammars the CLI knows how to drive
pub const KNOWN_GRAMMARS: &[&str] = &["errors", "prefix", "nested"];

/// Output formats the CLI can print
pub const KNOWN_FORMATS: &[&str] = &["text", "json"];

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Home directory not found")]
    HomeNotFound,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

pub(crate) fn validate_grammar(field: &str, grammar: &str) -> ConfigResult<()> {
    if !KNOWN_GRAMMARS.contains(&grammar) {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!(
                "unknown grammar '{}' (expected one of: {})",
                grammar,
                KNOWN_GRAMMARS.join(", ")
            ),
        });
    }
    Ok(())
}

pub(crate) fn validate_format(field: &str, format: &str) -> ConfigResult<()> {
    if !KNOWN_FORMATS.contains(&format) {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("must be 'text' or 'json', got '{}'", format),
        });
    }
    Ok(())
}

// Re-export main types
pub use global::GlobalConfig;
pub use loader::{Config, ConfigLoader};
pub use project::{CliConfig, ProjectConfig};
