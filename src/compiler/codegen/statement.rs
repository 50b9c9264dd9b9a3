use log::trace;

use crate::{
    assembly,
    compiler::{
        ast::{AssignOperator, BinaryOperator, Block, Expression, Statement, VarDecl},
        memory::{infer_type, Address, ValueType, VarInfo},
        CompilerError,
    },
};

use super::{
    expression::PRINTLN,
    lvalue::{Lvalue, Slot},
    Compiler, CompilerResult,
};

impl Compiler {
    /// Compiles a block in a new scope.
    pub(super) fn block(&mut self, block: &Block) -> CompilerResult<()> {
        self.symbols.push_scope();
        self.statements(block)?;
        self.symbols.pop_scope();
        Ok(())
    }

    /// Compiles the statements of a block in the current scope.
    pub(super) fn statements(&mut self, block: &Block) -> CompilerResult<()> {
        for statement in block.get_statements() {
            self.statement(statement)?;
        }
        Ok(())
    }

    fn statement(&mut self, statement: &Statement) -> CompilerResult<()> {
        trace!("{}: {}", self.frame.name, statement.root_str());
        match statement {
            Statement::Expression(exp) => self.expression(exp).map(|_| ()),
            Statement::Assign { target, op, value } => self.assign(target, *op, value),
            Statement::ShortVarDecl { names, values } => self.bind_locals(names, None, values),
            Statement::VarDecl(decl) => self.var_decl(decl),
            Statement::IncDec { target, increment } => self.inc_dec(target, *increment),
            Statement::If {
                cond,
                then_block,
                else_block,
            } => self.if_stmt(cond, then_block, else_block.as_ref()),
            Statement::For {
                init,
                cond,
                post,
                body,
            } => self.for_stmt(init.as_deref(), cond.as_ref(), post.as_deref(), body),
            Statement::Return(value) => self.return_stmt(value.as_ref()),
            Statement::Block(block) => self.block(block),
        }
    }

    fn var_decl(&mut self, decl: &VarDecl) -> CompilerResult<()> {
        let declared = match &decl.ty {
            Some(ty) => Some(self.symbols.value_type(ty)?),
            None => None,
        };

        if !decl.values.is_empty() {
            return self.bind_locals(&decl.names, declared, &decl.values);
        }

        let ty = declared.ok_or_else(|| {
            CompilerError::ArityOrShapeMismatch(format!(
                "`{}` has neither a type nor a value",
                decl.names.join(", ")
            ))
        })?;
        for name in decl.names.iter() {
            let address = self.allocate(&ty)?;
            self.zero_fill(&address, &ty)?;
            self.symbols.declare_var(name, VarInfo::new(address, ty.clone()))?;
        }
        Ok(())
    }

    /// Gives each name a new local holding the matching value. The names only
    /// come into scope once every value is stored, so `x := x + 1` reads the
    /// outer `x`.
    fn bind_locals(
        &mut self,
        names: &[String],
        declared: Option<ValueType>,
        values: &[Expression],
    ) -> CompilerResult<()> {
        if names.len() != values.len() {
            return Err(CompilerError::ArityOrShapeMismatch(format!(
                "{} names but {} values in declaration of `{}`",
                names.len(),
                values.len(),
                names.join(", ")
            )));
        }

        let mut bound = vec![];
        for (name, value) in names.iter().zip(values) {
            let ty = match &declared {
                Some(ty) => ty.clone(),
                None => self.type_of(value)?,
            };
            if ty == ValueType::Void {
                return Err(CompilerError::UnsupportedOperation(format!(
                    "`{}` is initialized with a call that returns no value",
                    name
                )));
            }

            let address = self.allocate(&ty)?;
            let context = format!("initializer of `{}`", name);
            self.store_value(&Slot::Storage(address.clone()), &ty, value, &context)?;
            bound.push((name, VarInfo::new(address, ty)));
        }

        for (name, info) in bound {
            self.symbols.declare_var(name, info)?;
        }
        Ok(())
    }

    /// The type a declaration without a type takes from its value.
    fn type_of(&self, value: &Expression) -> CompilerResult<ValueType> {
        match value {
            Expression::StructLiteral(name, _) => {
                self.symbols.lookup_struct(name)?;
                Ok(ValueType::Struct(name.clone()))
            }
            Expression::Identifier(var) => Ok(self.symbols.lookup_var(var)?.ty.clone()),
            Expression::Call(name, _) if name != PRINTLN => {
                Ok(self.symbols.lookup_func(name)?.ret.clone())
            }
            _ => {
                let symbols = &self.symbols;
                Ok(infer_type(
                    value,
                    &|n: &str| symbols.lookup_var(n).ok().map(|v| v.ty.clone()),
                    symbols,
                ))
            }
        }
    }

    /// Evaluates `value` and stores it, checked against `ty`, into `slot`.
    pub(super) fn store_value(
        &mut self,
        slot: &Slot,
        ty: &ValueType,
        value: &Expression,
        context: &str,
    ) -> CompilerResult<()> {
        match ty {
            ValueType::Struct(name) => self.copy_struct(name, value, slot),
            _ => {
                let found = self.expression(value)?;
                self.require(ty, &found, context)?;
                let dst = slot.operand(0, 0);
                assembly! {(self.code) {
                    mov *{dst}, %rax;
                }}
                Ok(())
            }
        }
    }

    /// Stores the zero value of `ty` at `address`, field by field for a struct.
    pub(super) fn zero_fill(&mut self, address: &Address, ty: &ValueType) -> CompilerResult<()> {
        let words = match ty {
            ValueType::Struct(name) => self
                .symbols
                .lookup_struct(name)?
                .fields()
                .map(|(_, off, fi)| (off, fi.ty.clone()))
                .collect::<Vec<_>>(),
            _ => vec![(0, ty.clone())],
        };
        for (off, fty) in words {
            self.zero_value(&fty);
            let dst = address.operand(off);
            assembly! {(self.code) {
                mov *{dst}, %rax;
            }}
        }
        Ok(())
    }

    fn assign(
        &mut self,
        target: &Expression,
        op: AssignOperator,
        value: &Expression,
    ) -> CompilerResult<()> {
        let lv = Lvalue::from_expression(target)?;
        let place = self.place(&lv)?;
        let context = format!("assignment to `{}`", target.root_str());

        let bop = match op.binary() {
            None => {
                if let ValueType::Struct(name) = &place.ty {
                    return self.copy_struct(name, value, &Slot::Storage(place.address.clone()));
                }
                let found = self.expression(value)?;
                self.require(&place.ty, &found, &context)?;
                let dst = place.operand();
                assembly! {(self.code) {
                    mov *{dst}, %rax;
                }}
                return Ok(());
            }
            Some(bop) => bop,
        };

        match (&place.ty, bop) {
            (ValueType::Int, _) | (ValueType::Str, BinaryOperator::Add) => (),
            (ty, _) => {
                return Err(CompilerError::UnsupportedOperation(format!(
                    "`{}` on {}",
                    op, ty
                )))
            }
        }

        let found = self.expression(value)?;
        self.require(&place.ty, &found, &context)?;
        self.push_rax();
        let dst = place.operand();
        assembly! {(self.code) {
            mov %rax, *{dst.clone()};
        }}
        self.pop_rcx();
        if place.ty == ValueType::Str {
            self.concat();
        } else {
            self.arithmetic(bop);
        }
        assembly! {(self.code) {
            mov *{dst}, %rax;
        }}
        Ok(())
    }

    fn inc_dec(&mut self, target: &Expression, increment: bool) -> CompilerResult<()> {
        let lv = Lvalue::from_expression(target)?;
        let place = self.place(&lv)?;
        let op = if increment { "++" } else { "--" };
        self.require(
            &ValueType::Int,
            &place.ty,
            &format!("operand of `{}`", op),
        )?;

        let dst = place.operand();
        if increment {
            assembly! {(self.code) {
                add *{dst}, 1;
            }}
        } else {
            assembly! {(self.code) {
                sub *{dst}, 1;
            }}
        }
        Ok(())
    }

    fn if_stmt(
        &mut self,
        cond: &Expression,
        then_block: &Block,
        else_block: Option<&Block>,
    ) -> CompilerResult<()> {
        let else_label = self.label("if_false");
        let end = self.label("if_end");

        let ty = self.expression(cond)?;
        self.require(&ValueType::Bool, &ty, "if condition")?;
        assembly! {(self.code) {
            cmp %rax, 0;
            je ^{else_label};
        }}
        self.block(then_block)?;
        assembly! {(self.code) {
            jmp ^{end};
        ^{else_label}:
        }}
        if let Some(else_block) = else_block {
            self.block(else_block)?;
        }
        assembly! {(self.code) {
        ^{end}:
        }}
        Ok(())
    }

    /// The init statement is scoped to the loop. A missing condition loops
    /// until a `return`.
    fn for_stmt(
        &mut self,
        init: Option<&Statement>,
        cond: Option<&Expression>,
        post: Option<&Statement>,
        body: &Block,
    ) -> CompilerResult<()> {
        self.symbols.push_scope();
        if let Some(init) = init {
            self.statement(init)?;
        }

        let top = self.label("for_cond");
        let end = self.label("for_end");
        assembly! {(self.code) {
        ^{top}:
        }}
        if let Some(cond) = cond {
            let ty = self.expression(cond)?;
            self.require(&ValueType::Bool, &ty, "for condition")?;
            assembly! {(self.code) {
                cmp %rax, 0;
                je ^{end};
            }}
        }
        self.block(body)?;
        if let Some(post) = post {
            self.statement(post)?;
        }
        assembly! {(self.code) {
            jmp ^{top};
        ^{end}:
        }}
        self.symbols.pop_scope();
        Ok(())
    }

    fn return_stmt(&mut self, value: Option<&Expression>) -> CompilerResult<()> {
        let found = match value {
            Some(value) => self.expression(value)?,
            None => ValueType::Void,
        };
        if found.is_struct() {
            return Err(CompilerError::UnsupportedOperation(format!(
                "`{}` returns a struct value",
                self.frame.name
            )));
        }
        let ret = self.frame.ret.clone();
        self.require(&ret, &found, "return value")?;

        let epilogue = self.frame.epilogue.clone();
        assembly! {(self.code) {
            jmp ^{epilogue};
        }}
        Ok(())
    }
}
