
pub mod lexer;
pub mod tokens;

pub use lexer::Lexer;
pub use tokens::{Lex, Token};

use thiserror::Error;

pub type LexerResult<T> = std::result::Result<T, LexerError>;

/// Errors which can be encountered while tokenizing a source file. Each
/// carries the line it was found on.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LexerError {
    #[error("L{0}: Lexer locked on {1:?}")]
    Locked(u32, char),
    #[error("L{0}: Unterminated string literal")]
    UnterminatedString(u32),
    #[error("L{0}: Unterminated block comment")]
    UnterminatedComment(u32),
    #[error("L{0}: Invalid escape sequence \\{1}")]
    InvalidEscapeSequence(u32, char),
    #[error("L{0}: Invalid integer")]
    InvalidInteger(u32),
}

impl LexerError {
    pub fn line(&self) -> u32 {
        use LexerError::*;
        match self {
            Locked(l, _)
            | UnterminatedString(l)
            | UnterminatedComment(l)
            | InvalidEscapeSequence(l, _)
            | InvalidInteger(l) => *l,
        }
    }
}
