//! Recursive descent parser from the lexer's tokens to a [`Program`](crate::compiler::ast::Program).
use thiserror::Error;

use super::lexer::tokens::Lex;

mod expression;
mod statement;
mod tokenstream;

pub mod parser;

pub use parser::{parse, parse_traced};

pub(super) type ParserResult<T> = std::result::Result<Option<T>, ParserError>;

/// Errors raised while building the syntax tree. Each carries the line of
/// the token where parsing failed.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ParserError {
    #[error("L{0}: Expected {1}, but found {2}")]
    ExpectedButFound(u32, Lex, String),
    #[error("L{0}: Expected expression after {1}")]
    ExpectedExpressionAfter(u32, String),
    #[error("L{0}: Expected type after {1}")]
    ExpectedTypeAfter(u32, String),
    #[error("L{0}: Expected identifier after {1}")]
    ExpectedIdentifierAfter(u32, String),
    #[error("L{0}: Expected a statement, but found {1}")]
    ExpectedStatement(u32, String),
    #[error("L{0}: Expected a top level declaration, but found {1}")]
    ExpectedDeclaration(u32, String),
    #[error("L{0}: Left side of := must be identifiers")]
    NonNameOnLhs(u32),
    #[error("L{0}: Assignment expects exactly one target and one value")]
    MultipleAssignment(u32),
    #[error("L{0}: Expected a function name before (")]
    InvalidCallee(u32),
    #[error("L{0}: Cannot mix keyed and positional values in a {1} literal")]
    MixedFieldInit(u32, String),
    #[error("L{0}: Missing package clause")]
    MissingPackage(u32),
}
