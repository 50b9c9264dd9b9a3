use serde::Serialize;

use super::{statement::Block, ty::Type};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FuncDecl {
    pub name: String,
    pub params: Vec<Parameter>,
    pub ret_ty: Option<Type>,
    pub body: Block,
}

impl FuncDecl {
    pub fn new(name: &str, params: Vec<Parameter>, ret_ty: Option<Type>, body: Block) -> FuncDecl {
        FuncDecl {
            name: name.into(),
            params,
            ret_ty,
            body,
        }
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub ty: Type,
}

impl Parameter {
    pub fn new(name: &str, ty: &Type) -> Parameter {
        Parameter {
            name: name.into(),
            ty: ty.clone(),
        }
    }
}
