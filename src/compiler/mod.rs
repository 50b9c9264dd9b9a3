/**
 * The Compiler takes the syntax tree of a program and converts it into x86-64
 * assembly language for the GNU assembler.
 *
 * Compilation runs in a fixed order of whole program passes:
 * 1. Resolve the layout of every struct type (`memory::struct_table`). Every
 * struct is laid out before any function is visited, so a function may use a
 * struct that is declared after it.
 * 2. Record the signature of every function and compute the size of its stack
 * frame (`memory::stack`).
 * 3. Intern every string literal (`memory::stringpool`).
 * 4. Generate the code of every function (`codegen`), tracking the variables in
 * scope in a `SymbolTable` and noting which runtime helpers are used.
 *
 * All of the state of a compilation is owned by a single `Compiler` value, so
 * independent compilations never share labels, offsets or helper flags.
 *
 * Every error is fatal: the first one aborts the compilation and no assembly is
 * produced.
 */
pub mod ast;
pub mod codegen;
pub mod error;
pub mod lexer;
pub mod memory;
pub mod parser;
pub mod x86;

pub use codegen::{Compiler, RuntimeHelpers};
pub use error::CompilerError;
