//! Input delivered to the engine

/// One unit of external input
///
/// The scanner pushes `Token` once per recognized unit and `EndOfInput`
/// exactly once when the source is exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input<T> {
    Token(T),
    EndOfInput,
}

impl<T> Input<T> {
    /// The form a procedure body sees: `None` means no further input
    pub fn into_token(self) -> Option<T> {
        match self {
            Input::Token(token) => Some(token),
            Input::EndOfInput => None,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Input::EndOfInput)
    }
}

impl<T> From<T> for Input<T> {
    fn from(token: T) -> Self {
        Input::Token(token)
    }
}
