use std::collections::HashMap;

use crate::compiler::ast::*;

/// Interns every distinct string literal of a program. Each literal is given
/// a unique id the first time it is seen, and the id determines the label of
/// its entry in the read only data section.
#[derive(Debug, Default, PartialEq)]
pub struct StringPool {
    pool: HashMap<String, usize>,
    order: Vec<String>,
}

impl StringPool {
    pub fn new() -> StringPool {
        StringPool::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// If the given string is not in the string pool, this will insert the
    /// string and generate a unique ID for it. Returns the ID of the string.
    pub fn insert(&mut self, s: &str) -> usize {
        if let Some(id) = self.pool.get(s) {
            return *id;
        }
        let id = self.order.len();
        self.pool.insert(s.into(), id);
        self.order.push(s.into());
        id
    }

    /// Returns the unique ID for a given string if the string is in the
    /// pool, otherwise it will return None.
    pub fn get(&self, s: &str) -> Option<usize> {
        self.pool.get(s).copied()
    }

    /// The data section label of a string in the pool.
    pub fn label(&self, s: &str) -> Option<String> {
        self.get(s).map(StringPool::label_of)
    }

    pub fn label_of(id: usize) -> String {
        format!(".Lstr_{}", id)
    }

    /// Every (label, string) pair in the order the strings were first seen.
    pub fn iter(&self) -> impl Iterator<Item = (String, &str)> {
        self.order
            .iter()
            .enumerate()
            .map(|(id, s)| (StringPool::label_of(id), s.as_str()))
    }

    /// Traverse through all the nodes of a program and add every string
    /// literal to the pool. Package level initializers are visited first.
    pub fn extract_from_program(&mut self, program: &Program) {
        for g in program.globals.iter() {
            self.extract_from_var_decl(g);
        }
        for f in program.functions.iter() {
            self.extract_from_function(f);
        }
    }

    pub fn extract_from_function(&mut self, func: &FuncDecl) {
        self.extract_from_block(&func.body);
    }

    pub fn extract_from_block(&mut self, block: &Block) {
        for s in block.get_statements() {
            self.extract_from_statement(s);
        }
    }

    pub fn extract_from_var_decl(&mut self, decl: &VarDecl) {
        for v in decl.values.iter() {
            self.extract_from(v);
        }
    }

    pub fn extract_from_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Expression(e) => self.extract_from(e),
            Statement::Assign { target, value, .. } => {
                self.extract_from(target);
                self.extract_from(value);
            }
            Statement::ShortVarDecl { values, .. } => {
                for v in values.iter() {
                    self.extract_from(v);
                }
            }
            Statement::VarDecl(decl) => self.extract_from_var_decl(decl),
            Statement::IncDec { target, .. } => self.extract_from(target),
            Statement::If {
                cond,
                then_block,
                else_block,
            } => {
                self.extract_from(cond);
                self.extract_from_block(then_block);
                if let Some(eb) = else_block {
                    self.extract_from_block(eb);
                }
            }
            Statement::For {
                init,
                cond,
                post,
                body,
            } => {
                if let Some(init) = init {
                    self.extract_from_statement(init);
                }
                if let Some(cond) = cond {
                    self.extract_from(cond);
                }
                if let Some(post) = post {
                    self.extract_from_statement(post);
                }
                self.extract_from_block(body);
            }
            Statement::Return(r) => {
                if let Some(val) = r {
                    self.extract_from(val);
                }
            }
            Statement::Block(b) => self.extract_from_block(b),
        }
    }

    pub fn extract_from(&mut self, exp: &Expression) {
        use Expression::*;

        match exp {
            Integer(..) | Boolean(..) | Identifier(..) => (),
            StringLiteral(s) => {
                self.insert(s);
            }
            FieldAccess(base, _) => self.extract_from(base),
            Index { array, index } => {
                self.extract_from(array);
                self.extract_from(index);
            }
            Slice { array, low, high } => {
                self.extract_from(array);
                if let Some(low) = low {
                    self.extract_from(low);
                }
                if let Some(high) = high {
                    self.extract_from(high);
                }
            }
            Call(_, args) => {
                for a in args.iter() {
                    self.extract_from(a);
                }
            }
            StructLiteral(_, fields) => {
                for f in fields.iter() {
                    self.extract_from(&f.value);
                }
            }
            UnaryOp(_, operand) => self.extract_from(operand),
            BinaryOp(_, l, r) => {
                self.extract_from(l);
                self.extract_from(r);
            }
        }
    }
}

/// Escapes a string so it can be written between the quotes of a `.string`
/// directive.
pub fn escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            c if (c as u32) < 0x20 || c as u32 == 0x7f => {
                escaped.push_str(&format!("\\{:03o}", c as u32))
            }
            c => escaped.push(c),
        }
    }
    escaped
}
