use serde::Serialize;

use super::ty::Type;

/// `type Name T`. Only struct types are given a layout; any other right
/// hand side is rejected when layouts are resolved.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TypeDecl {
    pub name: String,
    pub ty: Type,
}

impl TypeDecl {
    pub fn new(name: &str, ty: Type) -> TypeDecl {
        TypeDecl {
            name: name.into(),
            ty,
        }
    }

    /// The ordered field list if this declares a struct type.
    pub fn fields(&self) -> Option<&Vec<(String, Type)>> {
        match &self.ty {
            Type::Struct(fields) => Some(fields),
            _ => None,
        }
    }
}
