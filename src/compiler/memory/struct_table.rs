use log::debug;

use crate::compiler::{
    ast::{Primitive, Type, TypeDecl},
    CompilerError,
};

use super::{
    struct_definition::{FieldInfo, StructInfo},
    symbol_table::{SymbolTable, ValueType},
};

/**
Lays out every struct declared at the top level of a program and adds it to
the struct table of `table`.

Fields are given word sized slots in declaration order, so the first field
is at offset 0 and the size of a struct is the offset following its last
field. Only `int`, `bool` and `string` fields are supported: a field whose
type names another struct, or names nothing at all, is rejected. This must
finish for every declaration before any function is compiled because a
function may use a struct declared after it.
 */
pub fn resolve_struct_layouts(
    types: &[TypeDecl],
    table: &mut SymbolTable,
) -> Result<(), CompilerError> {
    for decl in types {
        let fields = decl.fields().ok_or_else(|| {
            CompilerError::UnsupportedOperation(format!(
                "type `{}` is declared as `{}`; only struct types are supported",
                decl.name, decl.ty
            ))
        })?;

        let mut sd = StructInfo::new(&decl.name);
        for (field, ty) in fields {
            let vt = field_type(&decl.name, field, ty)?;
            sd.add_field(field, FieldInfo::new(vt))?;
        }

        debug!("Struct {}: {} fields, {} bytes", sd.name, sd.len(), sd.size());
        table.declare_struct(sd)?;
    }
    Ok(())
}

fn field_type(struct_name: &str, field: &str, ty: &Type) -> Result<ValueType, CompilerError> {
    match ty {
        Type::Primitive(Primitive::Int) => Ok(ValueType::Int),
        Type::Primitive(Primitive::Bool) => Ok(ValueType::Bool),
        Type::Primitive(Primitive::String) => Ok(ValueType::Str),
        Type::Named(_) | Type::Struct(_) => Err(CompilerError::UnsupportedFieldType {
            struct_name: struct_name.into(),
            field: field.into(),
            ty: format!("{}", ty),
        }),
    }
}
