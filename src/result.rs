use thiserror::Error;

use crate::compiler::{lexer::LexerError, parser::ParserError, CompilerError};

pub type Result<T> = std::result::Result<T, Error>;

/// Any failure from one of the compilation stages. The driver maps each
/// variant onto its own exit code.
#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("Lexer: {0}")]
    Lexer(#[from] LexerError),
    #[error("Parser: {0}")]
    Parser(#[from] ParserError),
    #[error("Compiler: {0}")]
    Compiler(#[from] CompilerError),
    #[error("Output: {0}")]
    Output(String),
}
