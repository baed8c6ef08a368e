//! CLI settings resolved from flags and loaded configuration
//!
//! Precedence, lowest first: global config, project config (pushdown.toml),
//! PUSHDOWN_* environment variables, command-line flags.

use crate::{OutputFormat, RunArgs};
use anyhow::{anyhow, Context, Result};
use pushdown_config::{Config, ConfigLoader};
use pushdown_engine::{EngineOptions, Grammar, RunOptions};
use std::env;

/// Load configuration for the current working directory
pub fn load() -> Result<Config> {
    let cwd = env::current_dir().context("Failed to read the current directory")?;
    ConfigLoader::new()
        .load_from_directory(&cwd)
        .context("Failed to load configuration")
}

/// Everything a command needs to run a grammar
#[derive(Debug, Clone)]
pub struct Settings {
    pub grammar: Grammar,
    pub json: bool,
    pub run: RunOptions,
}

impl Settings {
    pub fn resolve(config: &Config, args: &RunArgs) -> Result<Self> {
        let grammar = match args.grammar {
            Some(grammar) => grammar,
            None => config
                .grammar()
                .parse::<Grammar>()
                .map_err(|e| anyhow!("Invalid configured grammar: {}", e))?,
        };

        let mut engine = EngineOptions::from_config(config);
        if let Some(max_depth) = args.max_depth {
            engine = engine.with_max_depth(max_depth);
        }

        let format = match (args.json, args.format) {
            (true, _) => OutputFormat::Json,
            (false, Some(format)) => format,
            (false, None) if config.format() == "json" => OutputFormat::Json,
            (false, None) => OutputFormat::Text,
        };

        Ok(Self {
            grammar,
            json: format == OutputFormat::Json,
            run: RunOptions {
                engine,
                nested_depth: args.depth,
            },
        })
    }
}
