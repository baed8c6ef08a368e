//! Feed command - push tokens given on the command line

use crate::commands::print_report;
use crate::config::Settings;
use anyhow::Result;
use pushdown_engine::driver::run_tokens;

pub fn run(tokens: &[String], settings: &Settings) -> Result<bool> {
    let report = run_tokens(settings.grammar, tokens, &settings.run, None);
    print_report(&report, settings.json)
}
