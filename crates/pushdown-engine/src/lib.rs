//! Pushdown Engine - push-driven recursive descent
//!
//! This library provides an incremental parsing engine whose call stack is
//! reified as data:
//! - Procedures are explicit state machines that suspend for a token or a child result
//! - Frames live in an arena with parent links and an O(1) frontier handle
//! - The engine accepts one token per `push` and drains everything at end of input
//! - Domain failures propagate frame by frame to the root
//!
//! The bundled grammars and the error-chain scanner show how an external
//! tokenizer drives the engine.

/// Pushdown engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod driver;
pub mod engine;
pub mod failure;
pub mod frame;
pub mod grammars;
pub mod input;
pub mod procedure;
pub mod scanner;
pub mod span;
pub mod stack;

pub use driver::{run_source, RunError, RunOptions, RunReport};
pub use engine::{Engine, EngineOptions, EngineStats};
pub use failure::{ParseError, ParseResult};
pub use frame::{FrameId, FrameState, FrameSummary};
pub use grammars::Grammar;
pub use input::Input;
pub use procedure::{Procedure, Resume, Step};
pub use scanner::{Message, ScanError, ScanResult, Scanner};
pub use span::Span;
