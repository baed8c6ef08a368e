//! Tracing subscriber setup
//!
//! Filter source, first match wins: `--log`, `PUSHDOWN_LOG`, the config
//! `log.level`, then `warn`.

use anyhow::{anyhow, Context, Result};
use pushdown_config::Config;
use std::env;
use std::io;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "PUSHDOWN_LOG";

/// Pick the filter directive to install
pub fn filter_directive(flag: Option<&str>, config: &Config) -> String {
    if let Some(flag) = flag {
        return flag.to_string();
    }
    match env::var(LOG_ENV) {
        Ok(directive) if !directive.trim().is_empty() => directive,
        _ => config.log_level().to_string(),
    }
}

/// Install the global subscriber, writing to stderr
pub fn init(flag: Option<&str>, config: &Config) -> Result<()> {
    let directive = filter_directive(flag, config);
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("Invalid log filter: {}", directive))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))
}
