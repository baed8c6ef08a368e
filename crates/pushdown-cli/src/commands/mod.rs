pub mod feed;
pub mod parse;
pub mod trace;

use anyhow::{Context, Result};
use pushdown_engine::RunReport;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Read a file, or stdin when the path is `-`
pub fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read stdin")?;
        return Ok(source);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read input file: {}", path.display()))
}

/// Print a run report; returns whether the run succeeded
pub fn print_report(report: &RunReport, json: bool) -> Result<bool> {
    if json {
        let rendered = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        println!("{}", rendered);
    } else {
        match (&report.display, &report.error) {
            (_, Some(err)) => eprintln!("error: {}", err),
            (Some(display), None) => println!("{}", display),
            (None, None) => {}
        }
    }
    Ok(report.is_ok())
}
