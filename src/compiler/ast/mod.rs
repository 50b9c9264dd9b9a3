//! The syntax tree handed from the parser to the code generator. Every node
//! owns its children and each node category is a closed enum, so each pass
//! over the tree is an exhaustive `match`.
mod expression;
mod module;
mod routinedef;
mod statement;
mod structdef;
mod ty;

pub use self::expression::{BinaryOperator, Expression, FieldInit, UnaryOperator};
pub use self::module::{Import, Program};
pub use self::routinedef::{FuncDecl, Parameter};
pub use self::statement::{AssignOperator, Block, Statement, VarDecl};
pub use self::structdef::TypeDecl;
pub use self::ty::{Primitive, Type};

/// Name of the entry function of a program.
pub const MAIN_FUNCTION: &str = "main";
