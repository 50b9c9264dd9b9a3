use crate::compiler::{
    ast::Expression,
    memory::{Address, ValueType},
    x86::assembly::{Operand, Reg, Reg64},
    CompilerError,
};

use super::{Compiler, CompilerResult};

/// The targets that can be assigned, incremented or decremented.
#[derive(Debug, PartialEq)]
pub(super) enum Lvalue<'a> {
    Variable(&'a str),
    Field(&'a str, &'a str),
    Index(&'a Expression, &'a Expression),
}

impl<'a> Lvalue<'a> {
    pub fn from_expression(exp: &'a Expression) -> CompilerResult<Lvalue<'a>> {
        match exp {
            Expression::Identifier(name) => Ok(Lvalue::Variable(name)),
            Expression::FieldAccess(base, field) => match base.as_ref() {
                Expression::Identifier(name) => Ok(Lvalue::Field(name, field)),
                _ => Err(CompilerError::InvalidLvalue(exp.root_str())),
            },
            Expression::Index { array, index } => Ok(Lvalue::Index(array, index)),
            _ => Err(CompilerError::InvalidLvalue(exp.root_str())),
        }
    }
}

/// A resolved word of storage and the type of the value it holds.
#[derive(Debug, PartialEq)]
pub(super) struct Place {
    pub address: Address,
    pub offset: i64,
    pub ty: ValueType,
}

impl Place {
    pub fn operand(&self) -> Operand {
        self.address.operand(self.offset)
    }
}

/// Where a struct value is copied to.
#[derive(Debug)]
pub(super) enum Slot {
    Storage(Address),
    /// Offset into the argument area at the top of the stack.
    Outgoing(i64),
}

impl Slot {
    /// The word `offset` bytes into this slot while `pushed` bytes are on the
    /// stack above the argument area.
    pub fn operand(&self, offset: i64, pushed: i64) -> Operand {
        match self {
            Slot::Storage(address) => address.operand(offset),
            Slot::Outgoing(at) => Operand::MemoryAddr(Reg::R64(Reg64::Rsp), at + offset + pushed),
        }
    }
}

impl Compiler {
    pub(super) fn place(&self, lv: &Lvalue) -> CompilerResult<Place> {
        match lv {
            Lvalue::Variable(name) => {
                let var = self.symbols.lookup_var(name)?;
                Ok(Place {
                    address: var.address.clone(),
                    offset: 0,
                    ty: var.ty.clone(),
                })
            }
            Lvalue::Field(name, field) => self.field_place(name, field),
            Lvalue::Index(array, _) => Err(CompilerError::UnsupportedOperation(format!(
                "assignment to an element of `{}`",
                array.root_str()
            ))),
        }
    }

    /// The storage of `var.field`.
    pub(super) fn field_place(&self, var: &str, field: &str) -> CompilerResult<Place> {
        let info = self.symbols.lookup_var(var)?;
        let struct_name = info
            .ty
            .struct_name()
            .ok_or_else(|| CompilerError::UndefinedField {
                struct_name: format!("{}", info.ty),
                field: field.into(),
            })?;
        let sd = self.symbols.lookup_struct(struct_name)?;
        let (offset, fi) = sd.field(field)?;
        Ok(Place {
            address: info.address.clone(),
            offset,
            ty: fi.ty.clone(),
        })
    }
}
