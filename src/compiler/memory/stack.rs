use std::collections::HashMap;

use log::debug;

use crate::compiler::{ast::*, CompilerError};

use super::{
    struct_definition::WORD_SIZE,
    symbol_table::{FuncInfo, SymbolTable, ValueType},
};

/// Rounds `n` up to the next multiple of 16.
pub fn align16(n: i64) -> i64 {
    (n + 15) / 16 * 16
}

/// Adds the parameter and return types of every function to the function
/// table, with an empty frame. The struct layouts must already be resolved.
pub fn declare_signatures(program: &Program, table: &mut SymbolTable) -> Result<(), CompilerError> {
    for f in program.functions.iter() {
        let params = f
            .params
            .iter()
            .map(|p| table.value_type(&p.ty))
            .collect::<Result<Vec<_>, _>>()?;
        let ret = match &f.ret_ty {
            Some(ty) => table.value_type(ty)?,
            None => ValueType::Void,
        };
        if ret.is_struct() {
            return Err(CompilerError::UnsupportedOperation(format!(
                "function `{}` returns struct `{}`",
                f.name, ret
            ))
            .in_function(&f.name));
        }
        table.declare_func(
            &f.name,
            FuncInfo {
                frame_size: 0,
                ret,
                params,
            },
        )?;
    }
    Ok(())
}

/**
Sets the frame size of every declared function.

The frame size of a function is found by scanning its body for declarations:
every local, including those inside nested `if` and `for` bodies, gets its own
slot, so the size is the sum of the sizes of all the locals rounded up to 16.
Package level variables must already be declared in `table` so that locals
copied from them get the right size.
 */
pub fn size_frames(program: &Program, table: &mut SymbolTable) -> Result<(), CompilerError> {
    for f in program.functions.iter() {
        let locals = FrameScan::new(table).scan_function(f);
        let frame_size = align16(locals);
        debug!("Function {}: {} bytes of locals, frame {}", f.name, locals, frame_size);
        table.lookup_func_mut(&f.name)?.frame_size = frame_size;
    }
    Ok(())
}

/// Walks a function body and sums the storage needed by its locals. Types of
/// initializers are inferred only far enough to know which locals are structs;
/// names that cannot be resolved are given a word and reported later, when
/// the body is compiled.
pub struct FrameScan<'a> {
    table: &'a SymbolTable,
    scopes: Vec<HashMap<String, ValueType>>,
    total: i64,
}

impl<'a> FrameScan<'a> {
    pub fn new(table: &'a SymbolTable) -> FrameScan<'a> {
        FrameScan {
            table,
            scopes: vec![HashMap::new()],
            total: 0,
        }
    }

    pub fn scan_function(mut self, func: &FuncDecl) -> i64 {
        for p in func.params.iter() {
            let ty = self.table.value_type(&p.ty).unwrap_or(ValueType::Int);
            self.bind(&p.name, ty);
        }
        self.scan_statements(&func.body);
        self.total
    }

    fn bind(&mut self, name: &str, ty: ValueType) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.into(), ty);
        }
    }

    fn allocate(&mut self, name: &str, ty: ValueType) {
        self.total += self.table.size_of(&ty).unwrap_or(WORD_SIZE).max(WORD_SIZE);
        self.bind(name, ty);
    }

    fn scan_block(&mut self, block: &Block) {
        self.scopes.push(HashMap::new());
        self.scan_statements(block);
        self.scopes.pop();
    }

    fn scan_statements(&mut self, block: &Block) {
        for s in block.get_statements() {
            self.scan_statement(s);
        }
    }

    fn scan_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::VarDecl(decl) => {
                let declared = decl.ty.as_ref().and_then(|ty| self.table.value_type(ty).ok());
                for (idx, name) in decl.names.iter().enumerate() {
                    let ty = match &declared {
                        Some(ty) => ty.clone(),
                        None => decl
                            .values
                            .get(idx)
                            .map(|v| self.type_of(v))
                            .unwrap_or(ValueType::Int),
                    };
                    self.allocate(name, ty);
                }
            }
            Statement::ShortVarDecl { names, values } => {
                let types = names
                    .iter()
                    .enumerate()
                    .map(|(idx, _)| {
                        values
                            .get(idx)
                            .map(|v| self.type_of(v))
                            .unwrap_or(ValueType::Int)
                    })
                    .collect::<Vec<_>>();
                for (name, ty) in names.iter().zip(types) {
                    self.allocate(name, ty);
                }
            }
            Statement::If {
                then_block,
                else_block,
                ..
            } => {
                self.scan_block(then_block);
                if let Some(eb) = else_block {
                    self.scan_block(eb);
                }
            }
            Statement::For {
                init, post, body, ..
            } => {
                self.scopes.push(HashMap::new());
                if let Some(init) = init {
                    self.scan_statement(init);
                }
                if let Some(post) = post {
                    self.scan_statement(post);
                }
                self.scan_block(body);
                self.scopes.pop();
            }
            Statement::Block(b) => self.scan_block(b),
            Statement::Expression(_)
            | Statement::Assign { .. }
            | Statement::IncDec { .. }
            | Statement::Return(_) => (),
        }
    }

    fn lookup(&self, name: &str) -> Option<ValueType> {
        self.scopes
            .iter()
            .rev()
            .find_map(|s| s.get(name).cloned())
            .or_else(|| self.table.lookup_var(name).ok().map(|v| v.ty.clone()))
    }

    /// Best effort type of an expression, without emitting any code.
    pub fn type_of(&self, exp: &Expression) -> ValueType {
        infer_type(exp, &|name: &str| self.lookup(name), self.table)
    }
}

/// Infers the type of an expression from the types of the variables it uses.
/// Unknown names and ill typed operands default to `int`; the code generator
/// reports the real error.
pub fn infer_type(
    exp: &Expression,
    lookup: &dyn Fn(&str) -> Option<ValueType>,
    table: &SymbolTable,
) -> ValueType {
    use Expression::*;
    match exp {
        Integer(_) => ValueType::Int,
        Boolean(_) => ValueType::Bool,
        StringLiteral(_) => ValueType::Str,
        Identifier(name) => lookup(name).unwrap_or(ValueType::Int),
        FieldAccess(base, field) => {
            match infer_type(base, lookup, table) {
                ValueType::Struct(name) => table
                    .lookup_struct(&name)
                    .ok()
                    .and_then(|sd| sd.get_field(field).map(|f| f.ty.clone()))
                    .unwrap_or(ValueType::Int),
                _ => ValueType::Int,
            }
        }
        Index { .. } | Slice { .. } => ValueType::Int,
        Call(name, _) => table
            .lookup_func(name)
            .map(|f| f.ret.clone())
            .unwrap_or(ValueType::Void),
        StructLiteral(name, _) => ValueType::Struct(name.clone()),
        BinaryOp(op, l, _) => {
            if op.is_comparison() || *op == BinaryOperator::BAnd || *op == BinaryOperator::BOr {
                ValueType::Bool
            } else if infer_type(l, lookup, table) == ValueType::Str {
                ValueType::Str
            } else {
                ValueType::Int
            }
        }
        UnaryOp(UnaryOperator::Not, _) => ValueType::Bool,
        UnaryOp(..) => ValueType::Int,
    }
}
