//! Suspendable procedures
//!
//! A procedure is one recursive-descent rule written as an explicit state
//! machine. The engine calls [`Procedure::resume`] each time the procedure is
//! allowed to run; the returned [`Step`] says why it stopped.
//!
//! There are exactly two suspension points:
//! - [`Step::AwaitToken`]: wait for the next externally pushed token
//! - [`Step::Call`]: run a child procedure and wait for its value
//!
//! ```text
//! Start ──► AwaitToken ──► Token(Some(t)) ──► Call(child) ──► Child(v) ──► Return(v')
//!                      └─► Token(None)  ──► Return / Fail
//! ```

/// Why a procedure is being resumed
#[derive(Debug, Clone, PartialEq)]
pub enum Resume<T, V> {
    /// First turn of a freshly created frame
    Start,
    /// The token this frame asked for; `None` once input is exhausted
    Token(Option<T>),
    /// Value returned by the child this frame called
    Child(V),
}

/// Why a procedure stopped running
pub enum Step<T, V> {
    /// Suspend until the engine delivers the next token
    AwaitToken,
    /// Suspend until this child procedure returns
    Call(Box<dyn Procedure<T, V>>),
    /// Finish with a value
    Return(V),
    /// Finish with a domain failure
    Fail(crate::failure::ParseError),
}

impl<T, V> Step<T, V> {
    /// Call `procedure` as a child of the current frame
    pub fn call(procedure: impl Procedure<T, V> + 'static) -> Self {
        Step::Call(Box::new(procedure))
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Step::AwaitToken => "await-token",
            Step::Call(_) => "call",
            Step::Return(_) => "return",
            Step::Fail(_) => "fail",
        }
    }
}

impl<T, V> std::fmt::Debug for Step<T, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Call(child) => write!(f, "Call({})", child.name()),
            Step::Fail(err) => write!(f, "Fail({})", err),
            other => f.write_str(other.kind()),
        }
    }
}

/// One suspendable parsing procedure
pub trait Procedure<T, V> {
    /// Name shown in stack traces and log events
    fn name(&self) -> &'static str;

    /// Run until the next suspension point or completion
    fn resume(&mut self, resume: Resume<T, V>) -> Step<T, V>;
}
