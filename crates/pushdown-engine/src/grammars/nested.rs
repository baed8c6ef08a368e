//! Descend-first grammar
//!
//! `Nested { depth: D }` calls itself D times before any frame asks for
//! input, so D+1 frames exist by the time the first token is wanted. The
//! innermost frame reads two tokens; every enclosing frame reads one more
//! after its child returns. The value is the number of real tokens a
//! subtree consumed, so a complete parse yields `D + 2`. Running out of
//! input is not an error: every level returns what it has counted so far.

use crate::procedure::{Procedure, Resume, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NestedState {
    Start,
    LeafFirst,
    LeafSecond,
    AwaitChild,
    AfterChild(usize),
}

#[derive(Debug)]
pub struct Nested {
    depth: usize,
    state: NestedState,
}

impl Nested {
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            state: NestedState::Start,
        }
    }

    /// Tokens a complete parse consumes
    pub fn expected_tokens(depth: usize) -> usize {
        depth + 2
    }
}

impl<T> Procedure<T, usize> for Nested {
    fn name(&self) -> &'static str {
        if self.depth == 0 {
            "nested-leaf"
        } else {
            "nested"
        }
    }

    fn resume(&mut self, resume: Resume<T, usize>) -> Step<T, usize> {
        match (self.state, resume) {
            (NestedState::Start, Resume::Start) if self.depth == 0 => {
                self.state = NestedState::LeafFirst;
                Step::AwaitToken
            }
            (NestedState::Start, Resume::Start) => {
                self.state = NestedState::AwaitChild;
                Step::call(Nested::new(self.depth - 1))
            }
            (NestedState::LeafFirst, Resume::Token(None)) => Step::Return(0),
            (NestedState::LeafSecond, Resume::Token(None)) => Step::Return(1),
            (NestedState::AfterChild(consumed), Resume::Token(None)) => Step::Return(consumed),
            (NestedState::LeafFirst, Resume::Token(Some(_))) => {
                self.state = NestedState::LeafSecond;
                Step::AwaitToken
            }
            (NestedState::LeafSecond, Resume::Token(Some(_))) => Step::Return(2),
            (NestedState::AwaitChild, Resume::Child(consumed)) => {
                self.state = NestedState::AfterChild(consumed);
                Step::AwaitToken
            }
            (NestedState::AfterChild(consumed), Resume::Token(Some(_))) => {
                Step::Return(consumed + 1)
            }
            (state, _) => unreachable!("nested resumed out of order in {:?}", state),
        }
    }
}
