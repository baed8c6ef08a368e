//! Prefix-notation integer arithmetic
//!
//! ```text
//! Program := Expr <end>
//! Expr    := Int | ("+" | "-" | "*") Expr Expr | "neg" Expr
//! ```
//!
//! [`Program`] and [`Expr`] parse by being pushed tokens through an
//! [`Engine`]. [`evaluate`] is an ordinary pull-style recursive descent over
//! a slice that accepts the same language and fails with the same errors;
//! the two must always agree.

use crate::engine::Engine;
use crate::failure::{ParseError, ParseResult};
use crate::procedure::{Procedure, Resume, Step};

const EXPECTED_EXPR: &str = "an integer or operator";
const EXPECTED_END: &str = "end of input";

/// Operator recognized by the grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Neg,
}

impl Op {
    pub fn from_token(token: &str) -> Option<Op> {
        match token {
            "+" => Some(Op::Add),
            "-" => Some(Op::Sub),
            "*" => Some(Op::Mul),
            "neg" => Some(Op::Neg),
            _ => None,
        }
    }

    pub fn arity(self) -> usize {
        match self {
            Op::Neg => 1,
            _ => 2,
        }
    }

    fn apply_binary(self, lhs: i64, rhs: i64) -> ParseResult<i64> {
        let value = match self {
            Op::Add => lhs.checked_add(rhs),
            Op::Sub => lhs.checked_sub(rhs),
            Op::Mul => lhs.checked_mul(rhs),
            Op::Neg => unreachable!("neg is unary"),
        };
        value.ok_or_else(overflow)
    }

    fn apply_unary(self, operand: i64) -> ParseResult<i64> {
        debug_assert_eq!(self, Op::Neg);
        operand.checked_neg().ok_or_else(overflow)
    }
}

fn overflow() -> ParseError {
    ParseError::malformed("integer overflow")
}

/// Classify one token at expression position
enum Lexeme {
    Int(i64),
    Op(Op),
}

fn lexeme(token: &str) -> ParseResult<Lexeme> {
    if let Some(op) = Op::from_token(token) {
        return Ok(Lexeme::Op(op));
    }
    token
        .parse::<i64>()
        .map(Lexeme::Int)
        .map_err(|_| ParseError::unexpected_token(token, EXPECTED_EXPR))
}

/// Root rule: one expression followed by end of input
#[derive(Debug, Default)]
pub struct Program {
    value: Option<i64>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Procedure<String, i64> for Program {
    fn name(&self) -> &'static str {
        "program"
    }

    fn resume(&mut self, resume: Resume<String, i64>) -> Step<String, i64> {
        match resume {
            Resume::Start => Step::call(Expr::new()),
            Resume::Child(value) => {
                self.value = Some(value);
                Step::AwaitToken
            }
            Resume::Token(Some(extra)) => {
                Step::Fail(ParseError::unexpected_token(extra, EXPECTED_END))
            }
            Resume::Token(None) => match self.value {
                Some(value) => Step::Return(value),
                None => unreachable!("program awaits end of input only after its expression"),
            },
        }
    }
}

#[derive(Debug, Default)]
enum ExprState {
    #[default]
    Operator,
    Operand {
        op: Op,
        lhs: Option<i64>,
    },
}

/// One expression: a literal, or an operator and its operands
#[derive(Debug, Default)]
pub struct Expr {
    state: ExprState,
}

impl Expr {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Procedure<String, i64> for Expr {
    fn name(&self) -> &'static str {
        "expr"
    }

    fn resume(&mut self, resume: Resume<String, i64>) -> Step<String, i64> {
        match resume {
            Resume::Start => Step::AwaitToken,
            Resume::Token(None) => Step::Fail(ParseError::unexpected_end(EXPECTED_EXPR)),
            Resume::Token(Some(token)) => match lexeme(&token) {
                Ok(Lexeme::Int(value)) => Step::Return(value),
                Ok(Lexeme::Op(op)) => {
                    self.state = ExprState::Operand { op, lhs: None };
                    Step::call(Expr::new())
                }
                Err(err) => Step::Fail(err),
            },
            Resume::Child(value) => {
                let ExprState::Operand { op, lhs } = &mut self.state else {
                    unreachable!("expr called a child before reading an operator");
                };
                let result = match (op.arity(), *lhs) {
                    (1, _) => op.apply_unary(value),
                    (_, None) => {
                        *lhs = Some(value);
                        return Step::call(Expr::new());
                    }
                    (_, Some(lhs)) => op.apply_binary(lhs, value),
                };
                match result {
                    Ok(value) => Step::Return(value),
                    Err(err) => Step::Fail(err),
                }
            }
        }
    }
}

/// Parse a whole token sequence through the engine
///
/// Tokens after the program has already failed are not pushed.
pub fn parse_tokens<I, S>(tokens: I) -> ParseResult<i64>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut engine = Engine::new(Program::new());
    for token in tokens {
        if engine.is_concluded() {
            break;
        }
        engine.push(token.into());
    }
    engine.into_result()
}

/// Evaluate a token slice by conventional recursive descent
pub fn evaluate(tokens: &[&str]) -> ParseResult<i64> {
    let mut pos = 0;
    let value = evaluate_expr(tokens, &mut pos)?;
    match tokens.get(pos) {
        Some(extra) => Err(ParseError::unexpected_token(*extra, EXPECTED_END)),
        None => Ok(value),
    }
}

fn evaluate_expr(tokens: &[&str], pos: &mut usize) -> ParseResult<i64> {
    let token = tokens
        .get(*pos)
        .ok_or_else(|| ParseError::unexpected_end(EXPECTED_EXPR))?;
    *pos += 1;

    match lexeme(token)? {
        Lexeme::Int(value) => Ok(value),
        Lexeme::Op(op) if op.arity() == 1 => op.apply_unary(evaluate_expr(tokens, pos)?),
        Lexeme::Op(op) => {
            let lhs = evaluate_expr(tokens, pos)?;
            let rhs = evaluate_expr(tokens, pos)?;
            op.apply_binary(lhs, rhs)
        }
    }
}
