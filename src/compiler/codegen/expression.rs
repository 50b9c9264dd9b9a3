use crate::{
    assembly,
    compiler::{
        ast::{BinaryOperator, Expression, FieldInit, UnaryOperator},
        memory::{align16, StringPool, StructInfo, ValueType},
        CompilerError,
    },
};

use super::{
    lvalue::Slot,
    runtime::{FMT_INT, FMT_INT_NL, FMT_NL, FMT_STR, FMT_STR_NL, PRINTF, STR_EMPTY, STR_FALSE, STR_TRUE},
    symbol, Compiler, CompilerResult,
};

/// The print primitive.
pub(super) const PRINTLN: &str = "fmt.Println";

impl Compiler {
    /// Emits the code for an expression, leaving its value in `rax`, and
    /// returns its type. Struct values emit no code here: the consumer copies
    /// them with `copy_struct`.
    pub(super) fn expression(&mut self, exp: &Expression) -> CompilerResult<ValueType> {
        use Expression::*;
        match exp {
            Integer(i) => {
                assembly! {(self.code) {
                    mov %rax, {*i};
                }}
                Ok(ValueType::Int)
            }
            Boolean(b) => {
                let v: i64 = if *b { 1 } else { 0 };
                assembly! {(self.code) {
                    mov %rax, {v};
                }}
                Ok(ValueType::Bool)
            }
            StringLiteral(s) => {
                let label = StringPool::label_of(self.strings.insert(s));
                assembly! {(self.code) {
                    lea %rax, [rel @{label}];
                }}
                Ok(ValueType::Str)
            }
            Identifier(name) => {
                let var = self.symbols.lookup_var(name)?.clone();
                if !var.ty.is_struct() {
                    let src = var.address.operand(0);
                    assembly! {(self.code) {
                        mov %rax, *{src};
                    }}
                }
                Ok(var.ty)
            }
            FieldAccess(base, field) => {
                let place = match base.as_ref() {
                    Identifier(var) => self.field_place(var, field)?,
                    _ => {
                        return Err(CompilerError::UnsupportedOperation(format!(
                            "field access on `{}`, which is not a variable",
                            base.root_str()
                        )))
                    }
                };
                let src = place.operand();
                assembly! {(self.code) {
                    mov %rax, *{src};
                }}
                Ok(place.ty)
            }
            Index { array, .. } => Err(CompilerError::UnsupportedOperation(format!(
                "indexing `{}`",
                array.root_str()
            ))),
            Slice { array, .. } => Err(CompilerError::UnsupportedOperation(format!(
                "slicing `{}`",
                array.root_str()
            ))),
            Call(name, args) => self.call(name, args),
            StructLiteral(name, _) => {
                self.symbols.lookup_struct(name)?;
                Ok(ValueType::Struct(name.clone()))
            }
            BinaryOp(op, l, r) => self.binary_op(*op, l, r),
            UnaryOp(op, operand) => self.unary_op(*op, operand),
        }
    }

    fn binary_op(
        &mut self,
        op: BinaryOperator,
        l: &Expression,
        r: &Expression,
    ) -> CompilerResult<ValueType> {
        if op == BinaryOperator::BAnd || op == BinaryOperator::BOr {
            return self.short_circuit(op, l, r);
        }

        let lty = self.expression(l)?;
        self.push_rax();
        let rty = self.expression(r)?;
        assembly! {(self.code) {
            mov %rcx, %rax;
        }}
        self.pop_rax();

        if lty.is_struct() || rty.is_struct() || lty == ValueType::Void || rty == ValueType::Void {
            return Err(unsupported(op, &lty, &rty));
        }
        if lty != rty {
            return Err(CompilerError::mismatch(
                &lty,
                &rty,
                &format!("right operand of `{}`", op),
            ));
        }

        use BinaryOperator::*;
        match (&lty, op) {
            (ValueType::Str, Add) => {
                self.concat();
                Ok(ValueType::Str)
            }
            (ValueType::Str, Eq) => {
                self.streq();
                Ok(ValueType::Bool)
            }
            (ValueType::Str, NEq) => {
                self.streq();
                assembly! {(self.code) {
                    xor %rax, 1;
                }}
                Ok(ValueType::Bool)
            }
            (ValueType::Int, op) if op.is_arithmetic() => {
                self.arithmetic(op);
                Ok(ValueType::Int)
            }
            (ValueType::Int, op) if op.is_comparison() => {
                self.comparison(op);
                Ok(ValueType::Bool)
            }
            (ValueType::Bool, Eq) | (ValueType::Bool, NEq) => {
                self.comparison(op);
                Ok(ValueType::Bool)
            }
            _ => Err(unsupported(op, &lty, &rty)),
        }
    }

    /// `rax = rax op rcx` for an arithmetic operator.
    pub(super) fn arithmetic(&mut self, op: BinaryOperator) {
        use BinaryOperator::*;
        match op {
            Add => {
                assembly! {(self.code) {
                    add %rax, %rcx;
                }}
            }
            Sub => {
                assembly! {(self.code) {
                    sub %rax, %rcx;
                }}
            }
            Mul => {
                assembly! {(self.code) {
                    imul %rax, %rcx;
                }}
            }
            Div => {
                assembly! {(self.code) {
                    cqo;
                    idiv %rcx;
                }}
            }
            Mod => {
                assembly! {(self.code) {
                    cqo;
                    idiv %rcx;
                    mov %rax, %rdx;
                }}
            }
            _ => (),
        }
    }

    /// `rax = rax op rcx` for a comparison operator, as 0 or 1.
    fn comparison(&mut self, op: BinaryOperator) {
        use BinaryOperator::*;
        assembly! {(self.code) {
            cmp %rax, %rcx;
        }}
        match op {
            Eq => {
                assembly! {(self.code) {
                    sete %al;
                }}
            }
            NEq => {
                assembly! {(self.code) {
                    setne %al;
                }}
            }
            Ls => {
                assembly! {(self.code) {
                    setl %al;
                }}
            }
            LsEq => {
                assembly! {(self.code) {
                    setle %al;
                }}
            }
            Gr => {
                assembly! {(self.code) {
                    setg %al;
                }}
            }
            _ => {
                assembly! {(self.code) {
                    setge %al;
                }}
            }
        }
        assembly! {(self.code) {
            movzx %rax, %al;
        }}
    }

    /// `&&` and `||`: the right operand is only reached when the left one does
    /// not decide the result.
    fn short_circuit(
        &mut self,
        op: BinaryOperator,
        l: &Expression,
        r: &Expression,
    ) -> CompilerResult<ValueType> {
        let is_and = op == BinaryOperator::BAnd;
        let short = self.label(if is_and { "and_false" } else { "or_true" });
        let end = self.label(if is_and { "and_end" } else { "or_end" });

        let lty = self.expression(l)?;
        self.require(&ValueType::Bool, &lty, &format!("left operand of `{}`", op))?;
        if is_and {
            assembly! {(self.code) {
                cmp %rax, 0;
                je ^{short};
            }}
        } else {
            assembly! {(self.code) {
                cmp %rax, 0;
                jne ^{short};
            }}
        }

        let rty = self.expression(r)?;
        self.require(&ValueType::Bool, &rty, &format!("right operand of `{}`", op))?;
        let decided: i64 = if is_and { 0 } else { 1 };
        assembly! {(self.code) {
            jmp ^{end};
        ^{short}:
            mov %rax, {decided};
        ^{end}:
        }}
        Ok(ValueType::Bool)
    }

    fn unary_op(&mut self, op: UnaryOperator, operand: &Expression) -> CompilerResult<ValueType> {
        let ty = self.expression(operand)?;
        let context = format!("operand of unary `{}`", op);
        match op {
            UnaryOperator::Plus => {
                self.require(&ValueType::Int, &ty, &context)?;
            }
            UnaryOperator::Negate => {
                self.require(&ValueType::Int, &ty, &context)?;
                assembly! {(self.code) {
                    neg %rax;
                }}
            }
            UnaryOperator::Not => {
                self.require(&ValueType::Bool, &ty, &context)?;
                assembly! {(self.code) {
                    cmp %rax, 0;
                    sete %al;
                    movzx %rax, %al;
                }}
            }
        }
        Ok(ty)
    }

    pub(super) fn require(
        &self,
        expected: &ValueType,
        found: &ValueType,
        context: &str,
    ) -> CompilerResult<()> {
        if expected == found {
            Ok(())
        } else {
            Err(CompilerError::mismatch(expected, found, context))
        }
    }

    fn call(&mut self, name: &str, args: &[Expression]) -> CompilerResult<ValueType> {
        if name == PRINTLN {
            self.println(args)?;
            return Ok(ValueType::Void);
        }

        let info = self.symbols.lookup_func(name)?.clone();
        if args.len() != info.params.len() {
            return Err(CompilerError::ArityOrShapeMismatch(format!(
                "`{}` takes {} arguments but {} were given",
                name,
                info.params.len(),
                args.len()
            )));
        }

        let sizes = info
            .params
            .iter()
            .map(|p| self.symbols.size_of(p))
            .collect::<CompilerResult<Vec<_>>>()?;
        let area = align16(sizes.iter().sum()) + self.stack_bytes % 16;
        if area > 0 {
            assembly! {(self.code) {
                sub %rsp, {area};
            }}
            self.stack_bytes += area;
        }

        let mut at = 0;
        for (idx, ((arg, param), size)) in args.iter().zip(info.params.iter()).zip(sizes).enumerate() {
            let ty = self.expression(arg)?;
            self.require(param, &ty, &format!("argument {} of `{}`", idx + 1, name))?;
            match param {
                ValueType::Struct(sname) => self.copy_struct(sname, arg, &Slot::Outgoing(at))?,
                _ => {
                    assembly! {(self.code) {
                        mov [%rsp+{at}], %rax;
                    }}
                }
            }
            at += size;
        }

        let target = symbol(name);
        assembly! {(self.code) {
            call @{target};
        }}
        if area > 0 {
            assembly! {(self.code) {
                add %rsp, {area};
            }}
            self.stack_bytes -= area;
        }
        Ok(info.ret)
    }

    /// One `printf` per argument, separated by spaces and ended by a newline.
    fn println(&mut self, args: &[Expression]) -> CompilerResult<()> {
        if args.is_empty() {
            assembly! {(self.code) {
                lea %rdi, [rel @{FMT_NL}];
                mov %rax, 0;
            }}
            self.call_aligned(PRINTF);
            return Ok(());
        }

        for (idx, arg) in args.iter().enumerate() {
            let last = idx + 1 == args.len();
            let fmt = match self.expression(arg)? {
                ValueType::Int => {
                    assembly! {(self.code) {
                        mov %rsi, %rax;
                    }}
                    if last { FMT_INT_NL } else { FMT_INT }
                }
                ValueType::Str => {
                    assembly! {(self.code) {
                        mov %rsi, %rax;
                    }}
                    if last { FMT_STR_NL } else { FMT_STR }
                }
                ValueType::Bool => {
                    let is_false = self.label("print_false");
                    let end = self.label("print_end");
                    assembly! {(self.code) {
                        cmp %rax, 0;
                        je ^{is_false};
                        lea %rsi, [rel @{STR_TRUE}];
                        jmp ^{end};
                    ^{is_false}:
                        lea %rsi, [rel @{STR_FALSE}];
                    ^{end}:
                    }}
                    if last { FMT_STR_NL } else { FMT_STR }
                }
                ty => {
                    return Err(CompilerError::UnsupportedOperation(format!(
                        "printing `{}` of type {}",
                        arg.root_str(),
                        ty
                    )))
                }
            };
            assembly! {(self.code) {
                lea %rdi, [rel @{fmt}];
                mov %rax, 0;
            }}
            self.call_aligned(PRINTF);
        }
        Ok(())
    }

    /// Loads the zero value of a scalar type into `rax`.
    pub(super) fn zero_value(&mut self, ty: &ValueType) {
        match ty {
            ValueType::Str => {
                assembly! {(self.code) {
                    lea %rax, [rel @{STR_EMPTY}];
                }}
            }
            _ => {
                assembly! {(self.code) {
                    mov %rax, 0;
                }}
            }
        }
    }

    /// Copies the struct value `source`, a variable or a literal of struct
    /// `name`, into `dest`. Fields are read in declaration order.
    pub(super) fn copy_struct(
        &mut self,
        name: &str,
        source: &Expression,
        dest: &Slot,
    ) -> CompilerResult<()> {
        let sd = self.symbols.lookup_struct(name)?.clone();
        let fields = sd
            .fields()
            .map(|(n, off, fi)| (n.to_string(), off, fi.ty.clone()))
            .collect::<Vec<_>>();
        let expected = ValueType::Struct(name.into());

        match source {
            Expression::Identifier(var) => {
                let info = self.symbols.lookup_var(var)?.clone();
                self.require(&expected, &info.ty, &format!("copy of `{}`", var))?;
                for (_, off, _) in fields.iter() {
                    let src = info.address.operand(*off);
                    let dst = dest.operand(*off, 0);
                    assembly! {(self.code) {
                        mov %rax, *{src};
                        mov *{dst}, %rax;
                    }}
                }
                Ok(())
            }
            Expression::StructLiteral(lit, inits) => {
                self.require(&expected, &ValueType::Struct(lit.clone()), "struct literal")?;
                let values = literal_values(&sd, inits)?;

                // all fields are evaluated before any is stored, so a literal
                // may read the struct it overwrites
                for ((fname, _, fty), value) in fields.iter().zip(values) {
                    match value {
                        Some(e) => {
                            let ty = self.expression(e)?;
                            self.require(fty, &ty, &format!("field `{}` of `{}`", fname, name))?;
                        }
                        None => self.zero_value(fty),
                    }
                    self.push_rax();
                }
                for (idx, (_, off, _)) in fields.iter().enumerate().rev() {
                    self.pop_rax();
                    let dst = dest.operand(*off, 8 * idx as i64);
                    assembly! {(self.code) {
                        mov *{dst}, %rax;
                    }}
                }
                Ok(())
            }
            _ => Err(CompilerError::UnsupportedOperation(format!(
                "`{}` cannot be used as a value of struct `{}`",
                source.root_str(),
                name
            ))),
        }
    }
}

fn unsupported(op: BinaryOperator, l: &ValueType, r: &ValueType) -> CompilerError {
    CompilerError::UnsupportedOperation(format!("`{}` on {} and {}", op, l, r))
}

/// Matches the entries of a struct literal to the fields of `sd`, in field
/// order. Fields without an entry are `None`.
fn literal_values<'a>(
    sd: &StructInfo,
    inits: &'a [FieldInit],
) -> CompilerResult<Vec<Option<&'a Expression>>> {
    let mut values = vec![None; sd.len()];
    let keyed = inits.iter().filter(|i| i.name.is_some()).count();

    if keyed == 0 {
        if inits.len() > sd.len() {
            return Err(CompilerError::ArityOrShapeMismatch(format!(
                "{} values given for the {} fields of `{}`",
                inits.len(),
                sd.len(),
                sd.name
            )));
        }
        for (idx, init) in inits.iter().enumerate() {
            values[idx] = Some(&init.value);
        }
        return Ok(values);
    }

    if keyed != inits.len() {
        return Err(CompilerError::ArityOrShapeMismatch(format!(
            "`{}` literal mixes keyed and positional fields",
            sd.name
        )));
    }
    for init in inits {
        if let Some(key) = &init.name {
            let idx = sd
                .fields()
                .position(|(n, _, _)| n == key.as_str())
                .ok_or_else(|| CompilerError::UndefinedField {
                    struct_name: sd.name.clone(),
                    field: key.clone(),
                })?;
            if values[idx].is_some() {
                return Err(CompilerError::ArityOrShapeMismatch(format!(
                    "field `{}` of `{}` is given twice",
                    key, sd.name
                )));
            }
            values[idx] = Some(&init.value);
        }
    }
    Ok(values)
}
