//! Configuration Loader
//!
//! Handles loading and merging configuration from multiple sources with proper precedence.

use crate::global::GlobalConfig;
use crate::project::{CliConfig, EngineConfig, ProjectConfig};
use crate::{validate_format, validate_grammar, ConfigError, ConfigResult, PROJECT_CONFIG_FILE};
use std::env;
use std::path::{Path, PathBuf};

/// Grammar used when nothing else selects one
pub const DEFAULT_GRAMMAR: &str = "errors";

/// Output format used when nothing else selects one
pub const DEFAULT_FORMAT: &str = "text";

/// Log filter used when nothing else selects one
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Configuration loader
///
/// Loads configuration from multiple sources and merges them with proper precedence:
/// 1. Global config (~/.pushdown/config.toml) - lowest priority
/// 2. Project config (./pushdown.toml) - overrides global
/// 3. Environment variables (PUSHDOWN_*) - overrides project
/// 4. CLI flags - highest priority (handled by caller)
pub struct ConfigLoader {
    /// Cached global config path
    global_config_path: Option<PathBuf>,
}

/// Merged configuration result
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Global configuration
    pub global: GlobalConfig,

    /// Project root directory (where pushdown.toml was found)
    pub project_root: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            global_config_path: None,
        }
    }

    /// Create a loader that reads the global config from an explicit path
    pub fn with_global_config_path(path: impl Into<PathBuf>) -> Self {
        Self {
            global_config_path: Some(path.into()),
        }
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find pushdown.toml, then loads and merges
    /// global config if it exists.
    pub fn load_from_directory(&mut self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, project_config) = self.find_project_config(start_dir)?;

        let global_config = self.load_global_config_or_default()?;
        let project_config = self.apply_env_overrides(project_config)?;

        Ok(Config {
            project: project_config,
            global: global_config,
            project_root,
        })
    }

    /// Load configuration from a specific project config file
    pub fn load_from_file(&mut self, config_path: &Path) -> ConfigResult<Config> {
        let project_config = ProjectConfig::load_from_file(config_path)?;
        let global_config = self.load_global_config_or_default()?;
        let project_config = self.apply_env_overrides(project_config)?;

        let project_root = config_path.parent().map(|p| p.to_path_buf());

        Ok(Config {
            project: project_config,
            global: global_config,
            project_root,
        })
    }

    /// Find project configuration by walking up directory tree
    ///
    /// Returns (project_root, project_config) or error if a found file is invalid
    fn find_project_config(
        &self,
        start_dir: &Path,
    ) -> ConfigResult<(Option<PathBuf>, ProjectConfig)> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(PROJECT_CONFIG_FILE);

            if config_path.exists() {
                let project_config = ProjectConfig::load_from_file(&config_path)?;
                return Ok((Some(current), project_config));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok((None, ProjectConfig::default())),
            }
        }
    }

    /// Load global configuration from ~/.pushdown/config.toml
    fn load_global_config(&mut self) -> ConfigResult<GlobalConfig> {
        let path = match &self.global_config_path {
            Some(path) => path.clone(),
            None => {
                let path = GlobalConfig::global_config_path()?;
                self.global_config_path = Some(path.clone());
                path
            }
        };

        // Global config is optional - if it doesn't exist, return default
        if !path.exists() {
            return Ok(GlobalConfig::default());
        }

        GlobalConfig::load_from_file(&path)
    }

    /// Global config, or the defaults when there is no home directory
    ///
    /// An unreadable or invalid global file is still an error.
    fn load_global_config_or_default(&mut self) -> ConfigResult<GlobalConfig> {
        match self.load_global_config() {
            Err(ConfigError::HomeNotFound) => Ok(GlobalConfig::default()),
            other => other,
        }
    }

    /// Apply environment variable overrides to project config
    ///
    /// Recognized: PUSHDOWN_MAX_DEPTH, PUSHDOWN_GRAMMAR, PUSHDOWN_FORMAT
    fn apply_env_overrides(&self, mut config: ProjectConfig) -> ConfigResult<ProjectConfig> {
        if let Ok(depth) = env::var("PUSHDOWN_MAX_DEPTH") {
            let depth: usize = depth.trim().parse().map_err(|_| ConfigError::InvalidValue {
                field: "PUSHDOWN_MAX_DEPTH".to_string(),
                reason: format!("expected a positive integer, got '{}'", depth),
            })?;
            if depth == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "PUSHDOWN_MAX_DEPTH".to_string(),
                    reason: "must be at least 1".to_string(),
                });
            }
            config
                .engine
                .get_or_insert_with(EngineConfig::default)
                .max_depth = Some(depth);
        }

        if let Ok(grammar) = env::var("PUSHDOWN_GRAMMAR") {
            validate_grammar("PUSHDOWN_GRAMMAR", &grammar)?;
            config.cli.get_or_insert_with(CliConfig::default).grammar = Some(grammar);
        }

        if let Ok(format) = env::var("PUSHDOWN_FORMAT") {
            let format = format.to_lowercase();
            validate_format("PUSHDOWN_FORMAT", &format)?;
            config.cli.get_or_insert_with(CliConfig::default).format = Some(format);
        }

        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Effective depth limit (project only; there is no global limit)
    pub fn max_depth(&self) -> Option<usize> {
        self.project.max_depth()
    }

    /// Whether per-step frame tracing is enabled (default: false)
    pub fn trace_frames(&self) -> bool {
        self.project.trace_frames().unwrap_or(false)
    }

    /// Effective grammar (project > global > default)
    pub fn grammar(&self) -> &str {
        self.project
            .grammar()
            .or_else(|| self.global.default_grammar())
            .unwrap_or(DEFAULT_GRAMMAR)
    }

    /// Effective output format (project > global > default)
    pub fn format(&self) -> &str {
        self.project
            .format()
            .or_else(|| self.global.default_format())
            .unwrap_or(DEFAULT_FORMAT)
    }

    /// Effective log filter (project > global > default)
    pub fn log_level(&self) -> &str {
        self.project
            .log_level()
            .or_else(|| self.global.log_level())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Get the project root directory
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Check if a pushdown.toml was found
    pub fn is_project(&self) -> bool {
        self.project_root.is_some()
    }
}
