use anyhow::Result;
use clap::builder::RangedU64ValueParser;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use pushdown_engine::Grammar;
use std::io;
use std::path::PathBuf;

mod commands;
mod config;
mod logging;

/// Push-driven recursive-descent parsing engine.
///
/// Feeds tokens one at a time into a grammar whose call stack is kept as
/// data, then reports the value (or the failure) that reached the root.
///
/// EXAMPLES:
///     pushdown parse chain.txt                     Parse an error chain
///     pushdown parse - --grammar prefix            Parse prefix arithmetic from stdin
///     pushdown feed --grammar prefix + 2 3         Push tokens given on the command line
///     pushdown trace chain.txt                     Show the call stack after every token
///
/// ENVIRONMENT VARIABLES:
///     PUSHDOWN_GRAMMAR    Default grammar (errors, prefix, nested)
///     PUSHDOWN_FORMAT     Default output format (text, json)
///     PUSHDOWN_MAX_DEPTH  Frame depth limit
///     PUSHDOWN_LOG        Log filter, e.g. 'pushdown=debug'
#[derive(Parser)]
#[command(name = "pushdown")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Log filter directive (overrides PUSHDOWN_LOG and config)
    #[arg(long, global = true, value_name = "FILTER")]
    log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file (or stdin with '-') with a bundled grammar
    ///
    /// The error-chain grammar scans `error['msg', error[...]]` syntax;
    /// the other grammars split the input on whitespace.
    ///
    /// EXAMPLES:
    ///     pushdown parse chain.txt
    ///     echo '* 6 7' | pushdown parse - --grammar prefix --format json
    #[command(visible_alias = "p")]
    Parse {
        /// Input file, or '-' for stdin
        input: PathBuf,
        #[command(flatten)]
        run: RunArgs,
    },

    /// Push the given tokens verbatim, then end of input
    ///
    /// EXAMPLES:
    ///     pushdown feed 'low pressure' 'next err'
    ///     pushdown feed --grammar nested --depth 1 a b c
    Feed {
        /// Tokens to push, in order
        #[arg(allow_hyphen_values = true)]
        tokens: Vec<String>,
        #[command(flatten)]
        run: RunArgs,
    },

    /// Parse and print the call stack after every token
    ///
    /// EXAMPLES:
    ///     pushdown trace - --grammar prefix <<< '+ 1 neg 2'
    #[command(visible_alias = "t")]
    Trace {
        /// Input file, or '-' for stdin
        input: PathBuf,
        #[command(flatten)]
        run: RunArgs,
    },

    /// Generate shell completions
    ///
    /// EXAMPLES:
    ///     pushdown completions bash > /etc/bash_completion.d/pushdown
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Flags shared by every command that runs a grammar
#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// Grammar to run (errors, prefix, nested)
    #[arg(long, short = 'g')]
    grammar: Option<Grammar>,
    /// Output format (overrides PUSHDOWN_FORMAT and config)
    #[arg(long, value_enum, value_name = "FORMAT")]
    format: Option<OutputFormat>,
    /// Shorthand for --format json
    #[arg(long, conflicts_with = "format")]
    json: bool,
    /// Descent depth for the nested grammar
    #[arg(long, default_value_t = 2)]
    depth: usize,
    /// Frame depth limit, at least 1 (overrides PUSHDOWN_MAX_DEPTH and config)
    #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    max_depth: Option<usize>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "pushdown", &mut io::stdout());
        return Ok(());
    }

    let loaded = config::load()?;
    logging::init(cli.log.as_deref(), &loaded)?;

    let ok = match cli.command {
        Commands::Parse { input, run } => {
            let settings = config::Settings::resolve(&loaded, &run)?;
            commands::parse::run(&input, &settings)?
        }
        Commands::Feed { tokens, run } => {
            let settings = config::Settings::resolve(&loaded, &run)?;
            commands::feed::run(&tokens, &settings)?
        }
        Commands::Trace { input, run } => {
            let settings = config::Settings::resolve(&loaded, &run)?;
            commands::trace::run(&input, &settings)?
        }
        Commands::Completions { .. } => true,
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
