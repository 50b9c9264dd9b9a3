use std::collections::HashMap;

use crate::compiler::CompilerError;

use super::symbol_table::ValueType;

/// Every scalar, and every field of a struct, occupies one machine word.
pub const WORD_SIZE: i64 = 8;

#[derive(Clone, Debug, PartialEq)]
pub struct FieldInfo {
    pub type_name: String,
    pub ty: ValueType,
    pub size: i64,
}

impl FieldInfo {
    pub fn new(ty: ValueType) -> FieldInfo {
        FieldInfo {
            type_name: format!("{}", ty),
            ty,
            size: WORD_SIZE,
        }
    }
}

/// The resolved layout of a struct type: the byte offset of every field
/// relative to the start of the struct and the total size.
#[derive(Clone, Debug, PartialEq)]
pub struct StructInfo {
    pub name: String,
    fields: HashMap<String, FieldInfo>,
    offsets: HashMap<String, i64>,
    order: Vec<String>,
    size: i64,
}

impl StructInfo {
    pub fn new(name: &str) -> StructInfo {
        StructInfo {
            name: name.into(),
            fields: HashMap::new(),
            offsets: HashMap::new(),
            order: vec![],
            size: 0,
        }
    }

    /// Appends a field after all the fields added so far.
    pub fn add_field(&mut self, field: &str, info: FieldInfo) -> Result<(), CompilerError> {
        if self.fields.contains_key(field) {
            return Err(CompilerError::ArityOrShapeMismatch(format!(
                "field `{}` declared twice in struct `{}`",
                field, self.name
            )));
        }

        self.offsets.insert(field.into(), self.size);
        self.size += info.size;
        self.fields.insert(field.into(), info);
        self.order.push(field.into());
        Ok(())
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn offset_of(&self, field: &str) -> Option<i64> {
        self.offsets.get(field).copied()
    }

    pub fn get_field(&self, field: &str) -> Option<&FieldInfo> {
        self.fields.get(field)
    }

    /// Looks up a field and its offset, failing if this struct has no such field.
    pub fn field(&self, field: &str) -> Result<(i64, &FieldInfo), CompilerError> {
        match (self.offsets.get(field), self.fields.get(field)) {
            (Some(offset), Some(info)) => Ok((*offset, info)),
            _ => Err(CompilerError::UndefinedField {
                struct_name: self.name.clone(),
                field: field.into(),
            }),
        }
    }

    /// The fields in declaration order with their offsets.
    pub fn fields(&self) -> impl Iterator<Item = (&str, i64, &FieldInfo)> {
        self.order
            .iter()
            .map(move |name| (name.as_str(), self.offsets[name], &self.fields[name]))
    }

    /// The name of the field at `idx` in declaration order.
    pub fn field_name(&self, idx: usize) -> Option<&str> {
        self.order.get(idx).map(|n| n.as_str())
    }
}
