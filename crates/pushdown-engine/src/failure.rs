//! Failure channel
//!
//! A domain error raised inside a procedure body is captured on its frame as
//! an [`Outcome`]. The parent reads that outcome exactly once when it is next
//! resumed; a failure terminates the parent with the same error, so failures
//! unwind frame by frame until the root surfaces them from `Engine::result`.
//!
//! Misuse of the engine itself (resuming a completed frame, reading an
//! outcome twice) is not a `ParseError`: it panics.

use thiserror::Error;

/// Domain failure raised by grammar logic
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A token the grammar cannot accept at this point
    #[error("unexpected token '{found}', expected {expected}")]
    UnexpectedToken { found: String, expected: String },

    /// Input ended while the grammar still needed something
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: String },

    /// Structurally valid tokens carrying an invalid value
    #[error("malformed input: {0}")]
    Malformed(String),

    /// A child frame would be nested deeper than the configured limit
    #[error("frame depth {depth} exceeds the limit of {limit} (while calling {procedure})")]
    DepthLimitExceeded {
        depth: usize,
        limit: usize,
        procedure: &'static str,
    },
}

impl ParseError {
    pub fn unexpected_token(found: impl Into<String>, expected: impl Into<String>) -> Self {
        ParseError::UnexpectedToken {
            found: found.into(),
            expected: expected.into(),
        }
    }

    pub fn unexpected_end(expected: impl Into<String>) -> Self {
        ParseError::UnexpectedEnd {
            expected: expected.into(),
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        ParseError::Malformed(msg.into())
    }
}

/// Result type for values produced by procedures
pub type ParseResult<T> = Result<T, ParseError>;

/// Completion slot of a frame
///
/// Written once when the body finishes, read once by whoever observes the
/// completion. `Failed` and `Returned` are mutually exclusive, so a failure
/// always supersedes a value.
#[derive(Debug)]
pub(crate) enum Outcome<V> {
    Pending,
    Returned(V),
    Failed(ParseError),
    Taken,
}

impl<V> Outcome<V> {
    pub(crate) fn is_pending(&self) -> bool {
        matches!(self, Outcome::Pending)
    }

    pub(crate) fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    /// Fix the outcome of a finishing frame
    pub(crate) fn settle(&mut self, result: ParseResult<V>) {
        assert!(
            self.is_pending(),
            "protocol violation: frame outcome written twice"
        );
        *self = match result {
            Ok(value) => Outcome::Returned(value),
            Err(err) => Outcome::Failed(err),
        };
    }

    /// Read the outcome, leaving the slot spent
    pub(crate) fn take(&mut self) -> ParseResult<V> {
        match std::mem::replace(self, Outcome::Taken) {
            Outcome::Returned(value) => Ok(value),
            Outcome::Failed(err) => Err(err),
            Outcome::Pending => {
                panic!("protocol violation: frame outcome read before the frame completed")
            }
            Outcome::Taken => panic!("protocol violation: frame outcome read twice"),
        }
    }
}
