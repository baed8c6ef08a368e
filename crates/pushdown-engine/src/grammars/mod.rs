//! Bundled grammars
//!
//! Each grammar is a handful of [`Procedure`](crate::procedure::Procedure)
//! implementations over `String` tokens:
//! - `errors`: nested `error['msg', error[...]]` chains
//! - `prefix`: prefix-notation integer arithmetic
//! - `nested`: a rule that descends before reading any input

pub mod errors;
pub mod nested;
pub mod prefix;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Grammar selectable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grammar {
    Errors,
    Prefix,
    Nested,
}

impl Grammar {
    pub const ALL: [Grammar; 3] = [Grammar::Errors, Grammar::Prefix, Grammar::Nested];

    pub fn name(self) -> &'static str {
        match self {
            Grammar::Errors => "errors",
            Grammar::Prefix => "prefix",
            Grammar::Nested => "nested",
        }
    }

    /// Whether input is scanned as error-chain syntax rather than split on whitespace
    pub fn uses_scanner(self) -> bool {
        matches!(self, Grammar::Errors)
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Grammar {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Grammar::ALL
            .into_iter()
            .find(|g| g.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown grammar '{}'", s))
    }
}
