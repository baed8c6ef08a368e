//! Error-chain scanner
//!
//! Turns text such as
//!
//! ```text
//! error[ 'low pressure', error[ 'next err' ] ]
//! ```
//!
//! into one [`Message`] per clause, outermost first. The scanner is an
//! iterator so a caller can push each message into an [`Engine`] as soon as
//! it is recognized. The keyword is case-insensitive. Messages hold letters,
//! digits and whitespace, may be empty, and are quoted with `'` or `"`; the closing quote must match
//! the opening one. Whitespace is allowed between elements.

use crate::engine::Engine;
use crate::span::Span;
use thiserror::Error;

const KEYWORD: &str = "error";

/// Lexical failure in error-chain text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("unexpected character '{found}' at {span}, expected {expected}")]
    UnexpectedChar {
        found: char,
        expected: &'static str,
        span: Span,
    },

    #[error("unexpected end of input at offset {offset}, expected {expected}")]
    UnexpectedEnd { expected: &'static str, offset: usize },

    #[error("unterminated message starting at {span}")]
    UnterminatedMessage { span: Span },

    #[error("trailing input at {span}")]
    TrailingInput { span: Span },
}

impl ScanError {
    /// Byte range the error points at
    pub fn span(&self) -> Span {
        match self {
            ScanError::UnexpectedChar { span, .. }
            | ScanError::UnterminatedMessage { span }
            | ScanError::TrailingInput { span } => *span,
            ScanError::UnexpectedEnd { offset, .. } => Span::point(*offset),
        }
    }
}

pub type ScanResult<T> = Result<T, ScanError>;

/// One error message and where its text sits in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Expecting `error[` and a message
    Clause,
    /// After a message: a nested clause or the closing brackets
    AfterMessage,
    Done,
}

/// Incremental scanner over error-chain text
pub struct Scanner<'src> {
    source: &'src str,
    /// Byte offset of the next unread character
    pos: usize,
    /// Clauses opened and not yet closed
    open: usize,
    state: ScanState,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            open: 0,
            state: ScanState::Clause,
        }
    }

    /// Push every scanned message into `engine`, then end of input
    ///
    /// Stops pushing once the grammar has concluded but scans the rest of
    /// the source, so a scan error anywhere in it is still reported. Returns
    /// the number of messages pushed. On a scan error end of input is not
    /// sent.
    pub fn feed<V>(self, engine: &mut Engine<String, V>) -> ScanResult<usize> {
        let mut pushed = 0;
        for message in self {
            let message = message?;
            if engine.is_concluded() {
                continue;
            }
            engine.push(message.text);
            pushed += 1;
        }
        engine.finish();
        Ok(pushed)
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn char_error(&self, found: char, expected: &'static str) -> ScanError {
        ScanError::UnexpectedChar {
            found,
            expected,
            span: Span::new(self.pos, self.pos + found.len_utf8()),
        }
    }

    fn expect_char(&mut self, wanted: char, expected: &'static str) -> ScanResult<()> {
        self.skip_whitespace();
        match self.peek() {
            Some(c) if c == wanted => {
                self.advance();
                Ok(())
            }
            Some(c) => Err(self.char_error(c, expected)),
            None => Err(ScanError::UnexpectedEnd {
                expected,
                offset: self.pos,
            }),
        }
    }

    fn expect_keyword(&mut self) -> ScanResult<()> {
        self.skip_whitespace();
        for wanted in KEYWORD.chars() {
            match self.peek() {
                Some(c) if c.eq_ignore_ascii_case(&wanted) => {
                    self.advance();
                }
                Some(c) => return Err(self.char_error(c, "'error'")),
                None => {
                    return Err(ScanError::UnexpectedEnd {
                        expected: "'error'",
                        offset: self.pos,
                    })
                }
            }
        }
        Ok(())
    }

    fn quoted(&mut self) -> ScanResult<Message> {
        self.skip_whitespace();
        let start = self.pos;
        let quote = match self.peek() {
            Some(c @ ('\'' | '"')) => c,
            Some(c) => return Err(self.char_error(c, "a quoted message")),
            None => {
                return Err(ScanError::UnexpectedEnd {
                    expected: "a quoted message",
                    offset: self.pos,
                })
            }
        };
        self.advance();

        let text_start = self.pos;
        while let Some(c) = self.peek() {
            if c == quote {
                let text = self.source[text_start..self.pos].to_string();
                self.advance();
                return Ok(Message {
                    text,
                    span: Span::new(start, self.pos),
                });
            }
            if !(c.is_alphanumeric() || c.is_whitespace()) {
                return Err(self.char_error(c, "a letter, digit or whitespace"));
            }
            self.advance();
        }
        Err(ScanError::UnterminatedMessage {
            span: Span::new(start, self.pos),
        })
    }

    fn clause(&mut self) -> ScanResult<Message> {
        self.expect_keyword()?;
        self.expect_char('[', "'['")?;
        let message = self.quoted()?;
        self.open += 1;
        Ok(message)
    }

    fn close_all(&mut self) -> ScanResult<()> {
        while self.open > 0 {
            self.expect_char(']', "']'")?;
            self.open -= 1;
        }
        self.skip_whitespace();
        if self.pos < self.source.len() {
            return Err(ScanError::TrailingInput {
                span: Span::new(self.pos, self.source.len()),
            });
        }
        Ok(())
    }

    fn scan_next(&mut self) -> ScanResult<Option<Message>> {
        loop {
            match self.state {
                ScanState::Done => return Ok(None),
                ScanState::Clause => {
                    // Blank source is an empty chain
                    if self.open == 0 {
                        self.skip_whitespace();
                        if self.pos == self.source.len() {
                            self.state = ScanState::Done;
                            return Ok(None);
                        }
                    }
                    let message = self.clause()?;
                    self.state = ScanState::AfterMessage;
                    return Ok(Some(message));
                }
                ScanState::AfterMessage => {
                    self.skip_whitespace();
                    if self.peek() == Some(',') {
                        self.advance();
                        self.state = ScanState::Clause;
                    } else {
                        self.close_all()?;
                        self.state = ScanState::Done;
                    }
                }
            }
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = ScanResult<Message>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.scan_next() {
            Ok(message) => message.map(Ok),
            Err(err) => {
                self.state = ScanState::Done;
                Some(Err(err))
            }
        }
    }
}

/// Split source on whitespace, keeping the span of every word
pub fn words(source: &str) -> Vec<Message> {
    let mut words = Vec::new();
    let mut start = None;

    for (offset, c) in source.char_indices() {
        match (c.is_whitespace(), start) {
            (true, Some(begin)) => {
                words.push(Message {
                    text: source[begin..offset].to_string(),
                    span: Span::new(begin, offset),
                });
                start = None;
            }
            (false, None) => start = Some(offset),
            _ => {}
        }
    }
    if let Some(begin) = start {
        words.push(Message {
            text: source[begin..].to_string(),
            span: Span::new(begin, source.len()),
        });
    }

    words
}
