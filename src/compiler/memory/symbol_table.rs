use std::collections::HashMap;

use crate::compiler::{
    ast::{Primitive, Type},
    x86::assembly::Operand,
    CompilerError,
};

use super::struct_definition::{StructInfo, WORD_SIZE};

/// The type descriptor carried by every evaluated expression and every
/// declared name.
#[derive(Clone, Debug, PartialEq)]
pub enum ValueType {
    Int,
    Bool,
    Str,
    Struct(String),
    Void,
}

impl ValueType {
    pub fn is_struct(&self) -> bool {
        matches!(self, ValueType::Struct(_))
    }

    pub fn struct_name(&self) -> Option<&str> {
        match self {
            ValueType::Struct(name) => Some(name),
            _ => None,
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::Int => f.write_str("int"),
            ValueType::Bool => f.write_str("bool"),
            ValueType::Str => f.write_str("string"),
            ValueType::Struct(name) => f.write_str(name),
            ValueType::Void => f.write_str("void"),
        }
    }
}

/// Where the storage of a variable begins.
#[derive(Clone, Debug, PartialEq)]
pub enum Address {
    /// Signed byte offset from the frame base.
    Frame(i64),
    /// Label of a package level variable in the data section.
    Static(String),
}

impl Address {
    /// A word sized operand `offset` bytes into the storage at this address.
    pub fn operand(&self, offset: i64) -> Operand {
        match self {
            Address::Frame(base) => Operand::frame(base + offset),
            Address::Static(label) => Operand::global(label, offset),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VarInfo {
    pub address: Address,
    pub ty: ValueType,
}

impl VarInfo {
    pub fn new(address: Address, ty: ValueType) -> VarInfo {
        VarInfo { address, ty }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FuncInfo {
    /// Bytes reserved below the frame base, always a multiple of 16.
    pub frame_size: i64,
    pub ret: ValueType,
    pub params: Vec<ValueType>,
}

/**
Tracks every name that is visible while a program is compiled.

Variables live in a stack of scopes: a scope is pushed when a function body
or block is entered and popped when it is left. Looking up a variable walks
from the innermost scope outwards and returns the first match, so inner
declarations shadow outer ones without changing them. Functions and struct
layouts are kept in flat tables for the whole compilation.
 */
#[derive(Debug, Default)]
pub struct SymbolTable {
    scopes: Vec<HashMap<String, VarInfo>>,
    funcs: HashMap<String, FuncInfo>,
    structs: HashMap<String, StructInfo>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    /// Forgets every scope, function and struct.
    pub fn reset(&mut self) {
        self.scopes.clear();
        self.funcs.clear();
        self.structs.clear();
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) -> Option<HashMap<String, VarInfo>> {
        self.scopes.pop()
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Adds a variable to the innermost scope. A name already declared in that
    /// scope is replaced.
    pub fn declare_var(&mut self, name: &str, info: VarInfo) -> Result<(), CompilerError> {
        match self.scopes.last_mut() {
            Some(scope) => {
                scope.insert(name.into(), info);
                Ok(())
            }
            None => Err(CompilerError::NoScope(name.into())),
        }
    }

    pub fn lookup_var(&self, name: &str) -> Result<&VarInfo, CompilerError> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .ok_or_else(|| CompilerError::UndeclaredVariable(name.into()))
    }

    pub fn declare_func(&mut self, name: &str, info: FuncInfo) -> Result<(), CompilerError> {
        if self.funcs.contains_key(name) {
            return Err(CompilerError::DuplicateFunctionDefinition(name.into()));
        }
        self.funcs.insert(name.into(), info);
        Ok(())
    }

    pub fn lookup_func(&self, name: &str) -> Result<&FuncInfo, CompilerError> {
        self.funcs
            .get(name)
            .ok_or_else(|| CompilerError::UndeclaredFunction(name.into()))
    }

    pub(crate) fn lookup_func_mut(&mut self, name: &str) -> Result<&mut FuncInfo, CompilerError> {
        self.funcs
            .get_mut(name)
            .ok_or_else(|| CompilerError::UndeclaredFunction(name.into()))
    }

    pub fn declare_struct(&mut self, info: StructInfo) -> Result<(), CompilerError> {
        if self.structs.contains_key(&info.name) {
            return Err(CompilerError::DuplicateStructDefinition(info.name));
        }
        self.structs.insert(info.name.clone(), info);
        Ok(())
    }

    pub fn lookup_struct(&self, name: &str) -> Result<&StructInfo, CompilerError> {
        self.structs
            .get(name)
            .ok_or_else(|| CompilerError::UndefinedStructType(name.into()))
    }

    /// Converts a type written in source into a descriptor. Named types must
    /// refer to a struct that has already been laid out.
    pub fn value_type(&self, ty: &Type) -> Result<ValueType, CompilerError> {
        match ty {
            Type::Primitive(Primitive::Int) => Ok(ValueType::Int),
            Type::Primitive(Primitive::Bool) => Ok(ValueType::Bool),
            Type::Primitive(Primitive::String) => Ok(ValueType::Str),
            Type::Named(name) => {
                self.lookup_struct(name)?;
                Ok(ValueType::Struct(name.clone()))
            }
            Type::Struct(_) => Err(CompilerError::UnsupportedOperation(format!(
                "anonymous struct type `{}`",
                ty
            ))),
        }
    }

    /// Bytes occupied by a value of the given type.
    pub fn size_of(&self, ty: &ValueType) -> Result<i64, CompilerError> {
        match ty {
            ValueType::Struct(name) => Ok(self.lookup_struct(name)?.size()),
            ValueType::Void => Ok(0),
            _ => Ok(WORD_SIZE),
        }
    }
}
