//! Frames: one activation of a procedure
//!
//! Frames live in the [`FrameStack`](crate::stack::FrameStack) arena and are
//! addressed by [`FrameId`]. A frame owns its procedure, a single-token input
//! slot, and the slot its outcome is written to when the body finishes.

use crate::failure::{Outcome, ParseResult};
use crate::input::Input;
use crate::procedure::{Procedure, Resume, Step};
use serde::Serialize;
use std::fmt;

/// Handle to a frame in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FrameId(pub(crate) usize);

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Suspension state of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameState {
    /// Runnable: freshly created, or its child has just completed
    Running,
    /// Suspended until a token is deposited
    AwaitingToken,
    /// Suspended until its child completes
    AwaitingChild,
    /// Finished (normally or by failure); terminal
    Completed,
}

impl fmt::Display for FrameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FrameState::Running => "running",
            FrameState::AwaitingToken => "awaiting-token",
            FrameState::AwaitingChild => "awaiting-child",
            FrameState::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// Read-only view of a frame for stack traces
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrameSummary {
    pub id: FrameId,
    pub procedure: &'static str,
    pub depth: usize,
    pub state: FrameState,
}

impl fmt::Display for FrameSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:indent$}{} {} [{}]",
            "",
            self.id,
            self.procedure,
            self.state,
            indent = self.depth * 2
        )
    }
}

/// One activation of a procedure
pub(crate) struct Frame<T, V> {
    pub(crate) parent: Option<FrameId>,
    /// Root is depth 0
    pub(crate) depth: usize,
    pub(crate) state: FrameState,
    /// Set once the body has had its first turn
    pub(crate) started: bool,
    /// Child this frame is suspended on, until its outcome is collected
    pub(crate) child: Option<FrameId>,
    pending_token: Option<Input<T>>,
    outcome: Outcome<V>,
    procedure: Box<dyn Procedure<T, V>>,
}

impl<T, V> Frame<T, V> {
    pub(crate) fn new(
        procedure: Box<dyn Procedure<T, V>>,
        parent: Option<FrameId>,
        depth: usize,
    ) -> Self {
        Self {
            parent,
            depth,
            state: FrameState::Running,
            started: false,
            child: None,
            pending_token: None,
            outcome: Outcome::Pending,
            procedure,
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        self.procedure.name()
    }

    pub(crate) fn summary(&self, id: FrameId) -> FrameSummary {
        FrameSummary {
            id,
            procedure: self.name(),
            depth: self.depth,
            state: self.state,
        }
    }

    /// Place a token in the input slot of a frame suspended for one
    pub(crate) fn deposit(&mut self, input: Input<T>) {
        assert_eq!(
            self.state,
            FrameState::AwaitingToken,
            "protocol violation: token delivered to a frame that is not awaiting one"
        );
        assert!(
            self.pending_token.is_none(),
            "protocol violation: token slot already holds an undelivered token"
        );
        self.pending_token = Some(input);
    }

    /// Consume the deposited token for this resumption
    pub(crate) fn take_token(&mut self) -> Option<T> {
        match self.pending_token.take() {
            Some(input) => input.into_token(),
            None => panic!("protocol violation: frame resumed for a token that was never delivered"),
        }
    }

    pub(crate) fn run(&mut self, resume: Resume<T, V>) -> Step<T, V> {
        self.procedure.resume(resume)
    }

    pub(crate) fn settle(&mut self, result: ParseResult<V>) {
        self.state = FrameState::Completed;
        self.outcome.settle(result);
    }

    pub(crate) fn is_failed(&self) -> bool {
        self.outcome.is_failed()
    }

    /// Read the outcome of a completed frame; a second read panics
    pub(crate) fn take_outcome(&mut self) -> ParseResult<V> {
        assert_eq!(
            self.state,
            FrameState::Completed,
            "protocol violation: outcome requested from a frame that has not completed"
        );
        self.outcome.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Idle;

    impl Procedure<String, u32> for Idle {
        fn name(&self) -> &'static str {
            "idle"
        }

        fn resume(&mut self, _resume: Resume<String, u32>) -> Step<String, u32> {
            Step::AwaitToken
        }
    }

    fn frame() -> Frame<String, u32> {
        Frame::new(Box::new(Idle), None, 0)
    }

    #[test]
    fn test_new_frame_is_running_and_unstarted() {
        let frame = frame();
        assert_eq!(frame.state, FrameState::Running);
        assert!(!frame.started);
        assert_eq!(frame.name(), "idle");
    }

    #[test]
    fn test_token_consumed_exactly_once() {
        let mut frame = frame();
        frame.state = FrameState::AwaitingToken;
        frame.deposit(Input::Token("a".to_string()));
        assert_eq!(frame.take_token(), Some("a".to_string()));
    }

    #[test]
    fn test_end_of_input_arrives_as_empty_token() {
        let mut frame = frame();
        frame.state = FrameState::AwaitingToken;
        frame.deposit(Input::EndOfInput);
        assert_eq!(frame.take_token(), None);
    }

    #[test]
    #[should_panic(expected = "already holds")]
    fn test_double_deposit_panics() {
        let mut frame = frame();
        frame.state = FrameState::AwaitingToken;
        frame.deposit(Input::Token("a".to_string()));
        frame.deposit(Input::Token("b".to_string()));
    }

    #[test]
    #[should_panic(expected = "not awaiting one")]
    fn test_deposit_into_running_frame_panics() {
        let mut frame = frame();
        frame.deposit(Input::Token("a".to_string()));
    }

    #[test]
    fn test_summary_display_indents_by_depth() {
        let frame: Frame<String, u32> = Frame::new(Box::new(Idle), Some(FrameId(0)), 2);
        let line = frame.summary(FrameId(3)).to_string();
        assert_eq!(line, "    #3 idle [running]");
    }
}
