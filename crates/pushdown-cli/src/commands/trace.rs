//! Trace command - show the reified call stack after every token
//!
//! Text output prints one block per push:
//!
//! ```text
//! push '+'
//! #0 program [awaiting-child]
//!   #1 expr [awaiting-child]
//!     #2 expr [awaiting-token]
//! ```

use crate::commands::{print_report, read_input};
use crate::config::Settings;
use anyhow::{Context, Result};
use pushdown_engine::driver::END_LABEL;
use pushdown_engine::{run_source, FrameSummary};
use serde_json::json;
use std::path::Path;

pub fn run(input: &Path, settings: &Settings) -> Result<bool> {
    let source = read_input(input)?;
    let mut steps = Vec::new();
    let mut observe = |token: &str, frames: &[FrameSummary]| {
        steps.push((token.to_string(), frames.to_vec()));
    };

    let report = run_source(settings.grammar, &source, &settings.run, Some(&mut observe));

    if settings.json {
        let steps: Vec<_> = steps
            .iter()
            .map(|(token, frames)| json!({ "token": token, "frames": frames }))
            .collect();
        let rendered = serde_json::to_string_pretty(&json!({ "steps": steps, "report": report }))
            .context("Failed to serialize trace")?;
        println!("{}", rendered);
        return Ok(report.is_ok());
    }

    for (token, frames) in &steps {
        if token == END_LABEL {
            println!("end of input");
        } else {
            println!("push '{}'", token);
        }
        // Root first reads top-down
        for frame in frames.iter().rev() {
            println!("{}", frame);
        }
    }
    print_report(&report, false)
}
