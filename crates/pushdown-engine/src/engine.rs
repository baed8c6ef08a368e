//! Engine (driver)
//!
//! The engine owns the frame stack and exposes the whole driving surface to
//! the external scanner:
//!
//! ```text
//! scanner ──push(token)──► seek_accepting_frame ──deliver──► frame body
//! scanner ──push(EndOfInput)──► drain until nothing awaits a token
//! caller  ──result()──► root outcome (value or propagated failure)
//! ```
//!
//! # Example
//!
//! ```
//! use pushdown_engine::grammars::prefix::Program;
//! use pushdown_engine::{Engine, Input};
//!
//! let mut engine = Engine::new(Program::new());
//! for token in ["+", "2", "*", "3", "4"] {
//!     engine.push(Input::Token(token.to_string()));
//! }
//! engine.push(Input::EndOfInput);
//! assert_eq!(engine.result(), Ok(14));
//! ```

use crate::failure::ParseResult;
use crate::frame::{FrameState, FrameSummary};
use crate::input::Input;
use crate::procedure::Procedure;
use crate::stack::FrameStack;
use pushdown_config::Config;
use serde::Serialize;
use tracing::{debug, trace};

/// Engine tuning
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineOptions {
    /// Deepest frame that may be created (root is depth 0); `None` is unbounded
    pub max_depth: Option<usize>,
    /// Emit a trace event for every procedure turn and token delivery
    pub trace_frames: bool,
}

impl EngineOptions {
    /// Build engine options from loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_depth: config.max_depth(),
            trace_frames: config.trace_frames(),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

/// Counters describing one engine run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub frames_created: usize,
    pub frames_destroyed: usize,
    pub live_frames: usize,
    pub max_depth: usize,
    pub steps: usize,
    pub tokens_delivered: usize,
    pub end_tokens_delivered: usize,
}

/// Push-driven recursive-descent engine
///
/// `T` is the token type the scanner pushes; `V` is the value every
/// procedure in the grammar returns.
pub struct Engine<T, V> {
    stack: FrameStack<T, V>,
    /// Root outcome, read from the root frame once
    outcome: Option<ParseResult<V>>,
    tokens_delivered: usize,
    end_tokens_delivered: usize,
}

impl<T, V> Engine<T, V> {
    /// Create an engine whose root frame runs `root`
    ///
    /// The root does not run until input is pushed or the engine is queried.
    pub fn new(root: impl Procedure<T, V> + 'static) -> Self {
        Self::with_options(root, EngineOptions::default())
    }

    pub fn with_options(root: impl Procedure<T, V> + 'static, options: EngineOptions) -> Self {
        let mut stack = FrameStack::new(Box::new(root));
        stack.set_max_depth(options.max_depth);
        stack.set_trace_frames(options.trace_frames);
        Self {
            stack,
            outcome: None,
            tokens_delivered: 0,
            end_tokens_delivered: 0,
        }
    }

    /// Deliver one unit of input
    ///
    /// A token goes to the frame currently awaiting one; the tree is then
    /// run forward until it rests on the next frame awaiting a token (or the
    /// root completes). `EndOfInput` drains the whole tree.
    ///
    /// # Panics
    ///
    /// Pushing a token after the grammar has concluded is a protocol
    /// violation. Check [`Engine::is_concluded`] first when the input may
    /// run past the grammar.
    pub fn push(&mut self, input: impl Into<Input<T>>) {
        match input.into() {
            Input::Token(token) => {
                let Some(id) = self.stack.seek_accepting_frame() else {
                    panic!("protocol violation: token pushed after the grammar concluded");
                };
                self.tokens_delivered += 1;
                self.stack.deliver(id, Input::Token(token));
                // Rest on the next frame that wants input
                self.stack.seek_accepting_frame();
            }
            Input::EndOfInput => self.drain(),
        }
    }

    /// Shorthand for `push(Input::EndOfInput)`
    pub fn finish(&mut self) {
        self.push(Input::EndOfInput);
    }

    /// Deliver an empty token to every frame that still awaits one
    ///
    /// Frames created while draining are drained too. Draining a finished
    /// tree does nothing.
    fn drain(&mut self) {
        let mut delivered = 0;
        while let Some(id) = self.stack.seek_accepting_frame() {
            self.stack.deliver(id, Input::EndOfInput);
            delivered += 1;
        }
        self.end_tokens_delivered += delivered;
        if delivered > 0 {
            debug!(target: "pushdown::engine", delivered, "drained at end of input");
        } else {
            trace!(target: "pushdown::engine", "drain found nothing to finish");
        }
    }

    /// Whether the root has completed, so no further token can be accepted
    ///
    /// Runs the tree forward to find out.
    pub fn is_concluded(&mut self) -> bool {
        self.outcome.is_some() || self.stack.seek_accepting_frame().is_none()
    }

    /// State of the frontier frame
    pub fn frontier_state(&self) -> FrameState {
        self.stack.state(self.stack.frontier())
    }

    /// Depth of the frontier frame (root is 0)
    pub fn depth(&self) -> usize {
        self.stack.depth(self.stack.frontier())
    }

    /// The reified call stack, frontier first
    pub fn stack_trace(&self) -> Vec<FrameSummary> {
        self.stack.trace()
    }

    pub fn stats(&self) -> EngineStats {
        let stack = self.stack.stats();
        EngineStats {
            frames_created: stack.frames_created,
            frames_destroyed: stack.frames_destroyed,
            live_frames: self.stack.live_frames(),
            max_depth: stack.max_depth,
            steps: stack.steps,
            tokens_delivered: self.tokens_delivered,
            end_tokens_delivered: self.end_tokens_delivered,
        }
    }

    /// Take the root outcome, draining and reading the root frame on first use
    fn take_outcome(&mut self) -> ParseResult<V> {
        if let Some(outcome) = self.outcome.take() {
            return outcome;
        }
        self.drain();
        let outcome = self.stack.take_root_outcome();
        if let Err(err) = &outcome {
            debug!(target: "pushdown::engine", error = %err, "root failed");
        }
        outcome
    }

    /// Drain and read the root's value, or the failure that reached it
    ///
    /// Safe to call repeatedly: the root frame is read once and the outcome
    /// is kept by the engine.
    pub fn result(&mut self) -> ParseResult<V>
    where
        V: Clone,
    {
        let outcome = self.take_outcome();
        self.outcome.insert(outcome).clone()
    }

    /// Drain and take the root's value without cloning it
    pub fn into_result(mut self) -> ParseResult<V> {
        self.take_outcome()
    }
}
