pub mod result;

pub mod cli;
pub mod compiler;
pub mod diagnostics;

pub use cli::*;
pub use result::{Error, Result};

use compiler::{lexer::Lexer, parser, Compiler};

/// Runs the whole pipeline over a single source text: lexer, parser, the
/// struct/string pre-passes and the code generator. Returns the assembly
/// text on success.
pub fn compile_source(text: &str) -> Result<String> {
    let tokens = Lexer::new(text)
        .tokenize()
        .into_iter()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let program = parser::parse(tokens)?;
    let compiler = Compiler::compile(&program)?;

    let mut out = vec![];
    compiler
        .print(&mut out)
        .map_err(|e| Error::Output(e.to_string()))?;
    String::from_utf8(out).map_err(|e| Error::Output(e.to_string()))
}
