//! Error-chain grammar
//!
//! ```text
//! Error   := "error" "[" Message ("," Error)? "]"
//! Message := "'" (letter | digit | whitespace)* "'"
//! ```
//!
//! The scanner pushes one token per message, outermost first. Each
//! [`ErrorClause`] reads one message and calls a nested clause for the rest
//! of the chain, so a chain of N messages is N+1 frames deep at its end.
//! Messages may be empty; any other character fails the chain.

use crate::failure::ParseError;
use crate::procedure::{Procedure, Resume, Step};
use serde::Serialize;
use std::fmt;

/// Messages collected from an error chain, outermost first
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ErrorReport {
    pub messages: Vec<String>,
}

impl ErrorReport {
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// One-line summary, e.g. `2 errors: low pressure; next err`
    pub fn summary(&self) -> String {
        let noun = if self.len() == 1 { "error" } else { "errors" };
        format!("{} {}: {}", self.len(), noun, self.messages.join("; "))
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Root rule: a whole chain, which must hold at least one message
#[derive(Debug, Default)]
pub struct ErrorChain;

impl ErrorChain {
    pub fn new() -> Self {
        Self
    }
}

impl Procedure<String, ErrorReport> for ErrorChain {
    fn name(&self) -> &'static str {
        "error-chain"
    }

    fn resume(&mut self, resume: Resume<String, ErrorReport>) -> Step<String, ErrorReport> {
        match resume {
            Resume::Start => Step::call(ErrorClause::new()),
            Resume::Child(report) if report.is_empty() => {
                Step::Fail(ParseError::unexpected_end("an error message"))
            }
            Resume::Child(report) => Step::Return(report),
            Resume::Token(_) => unreachable!("error-chain never awaits a token"),
        }
    }
}

/// One `error[...]` clause: its message, then the clause nested inside it
#[derive(Debug, Default)]
pub struct ErrorClause {
    message: Option<String>,
}

impl ErrorClause {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Procedure<String, ErrorReport> for ErrorClause {
    fn name(&self) -> &'static str {
        "error-clause"
    }

    fn resume(&mut self, resume: Resume<String, ErrorReport>) -> Step<String, ErrorReport> {
        match resume {
            Resume::Start => Step::AwaitToken,
            // No clause here: the enclosing one was the innermost
            Resume::Token(None) => Step::Return(ErrorReport::default()),
            Resume::Token(Some(message)) => {
                if let Some(c) = message
                    .chars()
                    .find(|c| !(c.is_alphanumeric() || c.is_whitespace()))
                {
                    return Step::Fail(ParseError::malformed(format!(
                        "invalid character {:?} in error message",
                        c
                    )));
                }
                self.message = Some(message);
                Step::call(ErrorClause::new())
            }
            Resume::Child(mut rest) => {
                if let Some(message) = self.message.take() {
                    rest.messages.insert(0, message);
                }
                Step::Return(rest)
            }
        }
    }
}
