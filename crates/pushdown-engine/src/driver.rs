//! Running a bundled grammar over source text
//!
//! The driver picks the grammar's root procedure, tokenizes the source
//! (error-chain scanner or whitespace words), pushes every token into an
//! [`Engine`] and collects the outcome into a serializable [`RunReport`].

use crate::engine::{Engine, EngineOptions, EngineStats};
use crate::failure::ParseError;
use crate::frame::FrameSummary;
use crate::grammars::errors::ErrorChain;
use crate::grammars::nested::Nested;
use crate::grammars::prefix::Program;
use crate::grammars::Grammar;
use crate::scanner::{self, Message, ScanError, ScanResult, Scanner};
use crate::span::Span;
use serde::{Serialize, Serializer};
use std::fmt::Display;
use thiserror::Error;
use tracing::{debug, info};

/// Token label passed to the observer after end of input
pub const END_LABEL: &str = "<end>";

/// Callback invoked after every push with the token and the resulting stack
pub type Observer<'a> = &'a mut dyn FnMut(&str, &[FrameSummary]);

/// Why a run produced no value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Input continued after the grammar had concluded
    #[error("unconsumed input '{token}' (token {index}): the grammar already concluded")]
    Unconsumed { token: String, index: usize },
}

/// Options for one driver run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub engine: EngineOptions,
    /// Descent depth for the `nested` grammar
    pub nested_depth: usize,
}

/// Result of running a grammar over some input
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub grammar: Grammar,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    /// Human-readable rendering of the value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_error"
    )]
    pub error: Option<RunError>,
    pub stats: EngineStats,
}

impl RunReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

fn serialize_error<S: Serializer>(error: &Option<RunError>, serializer: S) -> Result<S::Ok, S::Error> {
    match error {
        Some(err) => serializer.collect_str(err),
        None => serializer.serialize_none(),
    }
}

/// Tokenize `source` for `grammar` and run it
pub fn run_source(
    grammar: Grammar,
    source: &str,
    options: &RunOptions,
    observer: Option<Observer<'_>>,
) -> RunReport {
    if grammar.uses_scanner() {
        run(grammar, Scanner::new(source), options, observer)
    } else {
        run(grammar, scanner::words(source).into_iter().map(Ok), options, observer)
    }
}

/// Run `grammar` over tokens that are already split
pub fn run_tokens<S: AsRef<str>>(
    grammar: Grammar,
    tokens: &[S],
    options: &RunOptions,
    observer: Option<Observer<'_>>,
) -> RunReport {
    let messages = tokens.iter().map(|token| {
        Ok(Message {
            text: token.as_ref().to_string(),
            span: Span::point(0),
        })
    });
    run(grammar, messages, options, observer)
}

fn run<I>(grammar: Grammar, tokens: I, options: &RunOptions, observer: Option<Observer<'_>>) -> RunReport
where
    I: Iterator<Item = ScanResult<Message>>,
{
    let report = match grammar {
        Grammar::Errors => {
            drive(grammar, Engine::with_options(ErrorChain::new(), options.engine), tokens, observer)
        }
        Grammar::Prefix => {
            drive(grammar, Engine::with_options(Program::new(), options.engine), tokens, observer)
        }
        Grammar::Nested => drive(
            grammar,
            Engine::with_options(Nested::new(options.nested_depth), options.engine),
            tokens,
            observer,
        ),
    };
    match &report.error {
        None => info!(target: "pushdown::engine", %grammar, "run succeeded"),
        Some(err) => info!(target: "pushdown::engine", %grammar, error = %err, "run failed"),
    }
    report
}

fn drive<V, I>(
    grammar: Grammar,
    mut engine: Engine<String, V>,
    tokens: I,
    mut observer: Option<Observer<'_>>,
) -> RunReport
where
    V: Clone + Serialize + Display,
    I: Iterator<Item = ScanResult<Message>>,
{
    let fed = feed(&mut engine, tokens, &mut observer);
    let outcome = fed.and_then(|()| {
        engine.finish();
        if let Some(observe) = observer.as_mut() {
            observe(END_LABEL, &engine.stack_trace());
        }
        engine.result().map_err(RunError::from)
    });

    let stats = engine.stats();
    debug!(target: "pushdown::engine", ?stats, "engine stats");
    match outcome {
        Ok(value) => RunReport {
            grammar,
            value: serde_json::to_value(&value).ok(),
            display: Some(value.to_string()),
            error: None,
            stats,
        },
        Err(err) => RunReport {
            grammar,
            value: None,
            display: None,
            error: Some(err),
            stats,
        },
    }
}

fn feed<V, I>(
    engine: &mut Engine<String, V>,
    tokens: I,
    observer: &mut Option<Observer<'_>>,
) -> Result<(), RunError>
where
    V: Clone,
    I: Iterator<Item = ScanResult<Message>>,
{
    for (index, message) in tokens.enumerate() {
        let message = message?;
        if engine.is_concluded() {
            // A failure already reached the root; report it rather than the leftover
            engine.result()?;
            return Err(RunError::Unconsumed {
                token: message.text,
                index,
            });
        }
        let label = message.text.clone();
        engine.push(message.text);
        if let Some(observe) = observer.as_mut() {
            observe(&label, &engine.stack_trace());
        }
    }
    Ok(())
}
