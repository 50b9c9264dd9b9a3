use serde::Serialize;

use super::{routinedef::FuncDecl, statement::VarDecl, structdef::TypeDecl};

/// A whole source file: the package clause, its imports and every top level
/// declaration, each list kept in source order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Program {
    pub package: String,
    pub imports: Vec<Import>,
    pub globals: Vec<VarDecl>,
    pub types: Vec<TypeDecl>,
    pub functions: Vec<FuncDecl>,
}

impl Program {
    pub fn new(package: &str) -> Program {
        Program {
            package: package.into(),
            ..Default::default()
        }
    }

    pub fn get_function(&self, name: &str) -> Option<&FuncDecl> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn get_type(&self, name: &str) -> Option<&TypeDecl> {
        self.types.iter().find(|t| t.name == name)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Import {
    pub path: String,
}
