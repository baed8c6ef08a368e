//! Shared procedures for engine integration tests
//!
//! Every procedure here records its lifecycle into a shared [`Log`], so tests
//! can assert which frames were created and in which order they were torn
//! down.

#![allow(dead_code)]

use pushdown_engine::{ParseError, Procedure, Resume, Step};
use std::cell::RefCell;
use std::rc::Rc;

pub use pretty_assertions::{assert_eq, assert_ne};

/// Lifecycle events in the order they happened
pub type Log = Rc<RefCell<Vec<String>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

/// Descends `remaining` levels, then reads one token at the bottom
///
/// Every level returns its child's value plus one, so the root of a chain
/// built with `Chain::root(n, ..)` returns `n + 1`.
pub struct Chain {
    level: usize,
    remaining: usize,
    log: Log,
}

impl Chain {
    pub fn root(remaining: usize, log: &Log) -> Self {
        Self::at(0, remaining, log)
    }

    fn at(level: usize, remaining: usize, log: &Log) -> Self {
        log.borrow_mut().push(format!("create {}", level));
        Self {
            level,
            remaining,
            log: Rc::clone(log),
        }
    }
}

impl Drop for Chain {
    fn drop(&mut self) {
        self.log.borrow_mut().push(format!("drop {}", self.level));
    }
}

impl Procedure<&'static str, usize> for Chain {
    fn name(&self) -> &'static str {
        "chain"
    }

    fn resume(&mut self, resume: Resume<&'static str, usize>) -> Step<&'static str, usize> {
        match resume {
            Resume::Start if self.remaining == 0 => Step::AwaitToken,
            Resume::Start => Step::call(Chain::at(self.level + 1, self.remaining - 1, &self.log)),
            Resume::Token(Some(_)) => Step::Return(1),
            Resume::Token(None) => Step::Fail(ParseError::unexpected_end("a token")),
            Resume::Child(value) => Step::Return(value + 1),
        }
    }
}

/// Awaits one token and fails whatever it is
pub struct Rejecting {
    log: Log,
}

impl Rejecting {
    pub fn new(log: &Log) -> Self {
        log.borrow_mut().push("create rejecting".to_string());
        Self { log: Rc::clone(log) }
    }
}

impl Procedure<&'static str, usize> for Rejecting {
    fn name(&self) -> &'static str {
        "rejecting"
    }

    fn resume(&mut self, resume: Resume<&'static str, usize>) -> Step<&'static str, usize> {
        match resume {
            Resume::Start => Step::AwaitToken,
            Resume::Token(token) => Step::Fail(ParseError::unexpected_token(
                token.unwrap_or("<end>"),
                "nothing",
            )),
            Resume::Child(_) => unreachable!("rejecting has no children"),
        }
    }
}

/// Calls a `Rejecting` child, then a `Chain` sibling
///
/// The sibling must never be created when the first child fails.
pub struct Siblings {
    called: usize,
    log: Log,
}

impl Siblings {
    pub fn new(log: &Log) -> Self {
        Self {
            called: 0,
            log: Rc::clone(log),
        }
    }
}

impl Procedure<&'static str, usize> for Siblings {
    fn name(&self) -> &'static str {
        "siblings"
    }

    fn resume(&mut self, resume: Resume<&'static str, usize>) -> Step<&'static str, usize> {
        self.log.borrow_mut().push(format!("siblings resumed ({} called)", self.called));
        match (self.called, resume) {
            (0, Resume::Start) => {
                self.called = 1;
                Step::call(Rejecting::new(&self.log))
            }
            (1, Resume::Child(_)) => {
                self.called = 2;
                Step::call(Chain::at(1, 0, &self.log))
            }
            (_, Resume::Child(value)) => Step::Return(value),
            (_, other) => panic!("siblings resumed unexpectedly with {:?}", other),
        }
    }
}
