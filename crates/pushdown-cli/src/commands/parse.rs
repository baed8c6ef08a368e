//! Parse command - run a grammar over a file or stdin

use crate::commands::{print_report, read_input};
use crate::config::Settings;
use anyhow::Result;
use pushdown_engine::run_source;
use std::path::Path;
use tracing::debug;

pub fn run(input: &Path, settings: &Settings) -> Result<bool> {
    let source = read_input(input)?;
    debug!(grammar = %settings.grammar, bytes = source.len(), "parsing input");

    let report = run_source(settings.grammar, &source, &settings.run, None);
    print_report(&report, settings.json)
}
