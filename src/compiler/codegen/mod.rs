//! Generates x86-64 assembly from the syntax tree of a program.
//!
//! Expressions are evaluated with a fixed two register scheme: every
//! expression leaves its value in `rax`, and a binary operator keeps its left
//! operand on the stack while the right operand is evaluated, then moves the
//! right operand into `rcx`. Struct values are never held in a register; they
//! are copied word by word between storage locations.
//!
//! Every function has the same frame layout:
//!
//! ```text
//!   rbp+16+..  parameters, in declaration order
//!   rbp+8      return address
//!   rbp        caller's rbp
//!   rbp-..     locals, the latest declared nearest rbp
//! ```
//!
//! The caller reserves the parameter area, stores the arguments into it,
//! calls, and releases it again. Every call is made with `rsp` aligned to 16
//! bytes.
use log::{debug, warn};

use crate::{
    assembly,
    compiler::{
        ast::{FuncDecl, Program, VarDecl, MAIN_FUNCTION},
        memory::{
            align16, declare_signatures, infer_type, resolve_struct_layouts, size_frames,
            Address, StringPool, SymbolTable, ValueType, VarInfo, WORD_SIZE,
        },
        x86::assembly::Inst,
        CompilerError,
    },
    operand,
};

mod expression;
mod lvalue;
mod runtime;
mod statement;
mod tests;

pub use runtime::RuntimeHelpers;

use lvalue::Slot;

type CompilerResult<T> = Result<T, CompilerError>;

/// The assembly symbol of a function. Only `main` keeps its source name;
/// every other function is prefixed so that it cannot clash with a register
/// name, a libc routine or a runtime helper.
fn symbol(name: &str) -> String {
    if name == MAIN_FUNCTION {
        name.into()
    } else {
        format!("golite_fn_{}", name)
    }
}

/// The function whose code is currently being generated.
#[derive(Debug)]
struct Frame {
    name: String,
    ret: ValueType,
    epilogue: String,
    /// Bytes of the reserved area handed out to locals.
    used: i64,
    /// Bytes handed out below the reserved area.
    overflow: i64,
    /// Bytes reserved by the prologue.
    reserved: i64,
    /// Index of the instruction which reserves the frame.
    reserve_at: usize,
}

impl Frame {
    fn new(name: &str, ret: ValueType, epilogue: String, reserved: i64, reserve_at: usize) -> Frame {
        Frame {
            name: name.into(),
            ret,
            epilogue,
            used: 0,
            overflow: 0,
            reserved,
            reserve_at,
        }
    }
}

#[derive(Debug)]
pub struct Compiler {
    code: Vec<Inst>,
    symbols: SymbolTable,
    strings: StringPool,
    /// Label and size of every package level variable.
    globals: Vec<(String, i64)>,
    helpers: RuntimeHelpers,
    labels: usize,
    /// Bytes pushed below the frame by the expression being evaluated.
    stack_bytes: i64,
    frame: Frame,
}

impl Compiler {
    fn new() -> Compiler {
        Compiler {
            code: vec![],
            symbols: SymbolTable::new(),
            strings: StringPool::new(),
            globals: vec![],
            helpers: RuntimeHelpers::default(),
            labels: 0,
            stack_bytes: 0,
            frame: Frame::new("", ValueType::Void, String::new(), 0, 0),
        }
    }

    /// Compiles a whole program. Any error aborts the compilation and no code
    /// is returned.
    pub fn compile(program: &Program) -> CompilerResult<Compiler> {
        let mut compiler = Compiler::new();
        compiler.compile_program(program)?;
        Ok(compiler)
    }

    pub fn print(&self, output: &mut dyn std::io::Write) -> std::io::Result<()> {
        for inst in self.code.iter() {
            writeln!(output, "{}", inst)?;
        }
        Ok(())
    }

    /// The runtime helpers which the program uses and which were appended to
    /// its code.
    pub fn used_helpers(&self) -> RuntimeHelpers {
        self.helpers
    }

    /// The struct and function tables built for the program.
    pub fn symbol_table(&self) -> &SymbolTable {
        &self.symbols
    }

    fn compile_program(&mut self, program: &Program) -> CompilerResult<()> {
        debug!("Resolving struct layouts");
        resolve_struct_layouts(&program.types, &mut self.symbols)?;

        debug!("Declaring function signatures");
        declare_signatures(program, &mut self.symbols)?;
        let main = program
            .get_function(MAIN_FUNCTION)
            .ok_or_else(|| CompilerError::UndeclaredFunction(MAIN_FUNCTION.into()))?;
        if !main.params.is_empty() || main.ret_ty.is_some() {
            return Err(CompilerError::ArityOrShapeMismatch(format!(
                "`{}` must take no parameters and return no value",
                MAIN_FUNCTION
            )));
        }

        debug!("Interning string literals");
        self.strings.extract_from_program(program);
        debug!("{} string literals", self.strings.len());

        self.symbols.push_scope();
        self.declare_globals(&program.globals)?;
        debug!("Sizing frames");
        size_frames(program, &mut self.symbols)?;
        for f in program.functions.iter() {
            self.traverse_function(f, &program.globals)
                .map_err(|e| e.in_function(&f.name))?;
        }
        self.symbols.pop_scope();

        self.assemble();
        debug!("Generated {} instructions", self.code.len());
        Ok(())
    }

    /// Gives every package level variable a label in the data section.
    fn declare_globals(&mut self, globals: &[VarDecl]) -> CompilerResult<()> {
        for decl in globals {
            if !decl.values.is_empty() && decl.values.len() != decl.names.len() {
                return Err(CompilerError::ArityOrShapeMismatch(format!(
                    "{} names but {} values in declaration of `{}`",
                    decl.names.len(),
                    decl.values.len(),
                    decl.names.join(", ")
                )));
            }

            let declared = match &decl.ty {
                Some(ty) => Some(self.symbols.value_type(ty)?),
                None => None,
            };
            for (idx, name) in decl.names.iter().enumerate() {
                let ty = match (&declared, decl.values.get(idx)) {
                    (Some(ty), _) => ty.clone(),
                    (None, Some(value)) => {
                        let symbols = &self.symbols;
                        infer_type(
                            value,
                            &|n: &str| symbols.lookup_var(n).ok().map(|v| v.ty.clone()),
                            symbols,
                        )
                    }
                    (None, None) => {
                        return Err(CompilerError::ArityOrShapeMismatch(format!(
                            "`{}` has neither a type nor a value",
                            name
                        )))
                    }
                };
                if ty == ValueType::Void {
                    return Err(CompilerError::UnsupportedOperation(format!(
                        "`{}` is initialized with a call that returns no value",
                        name
                    )));
                }

                let label = format!("golite_global_{}", name);
                if self.globals.iter().any(|(l, _)| *l == label) {
                    return Err(CompilerError::UnsupportedOperation(format!(
                        "package variable `{}` is declared twice",
                        name
                    )));
                }
                let size = self.symbols.size_of(&ty)?.max(WORD_SIZE);
                self.globals.push((label.clone(), size));
                self.symbols
                    .declare_var(name, VarInfo::new(Address::Static(label), ty))?;
            }
        }
        Ok(())
    }

    /// Runs the initializers of the package level variables, in declaration
    /// order. This is done at the start of `main`.
    fn init_globals(&mut self, globals: &[VarDecl]) -> CompilerResult<()> {
        for decl in globals {
            for (idx, name) in decl.names.iter().enumerate() {
                let info = self.symbols.lookup_var(name)?.clone();
                match decl.values.get(idx) {
                    Some(value) => {
                        let context = format!("initializer of `{}`", name);
                        self.store_value(&Slot::Storage(info.address), &info.ty, value, &context)?
                    }
                    None => self.zero_fill(&info.address, &info.ty)?,
                }
            }
        }
        Ok(())
    }

    fn traverse_function(&mut self, f: &FuncDecl, globals: &[VarDecl]) -> CompilerResult<()> {
        let info = self.symbols.lookup_func(&f.name)?.clone();
        debug!("Compiling {}: frame {} bytes", f.name, info.frame_size);

        if info.ret != ValueType::Void && !f.body.terminates() {
            return Err(CompilerError::MissingReturn(f.name.clone()));
        }

        let epilogue = self.label("epilogue");
        let entry = symbol(&f.name);
        assembly! {(self.code) {
            global {entry};
        @{entry}:
            push %rbp;
            mov %rbp, %rsp;
        }}
        let reserve_at = self.code.len();
        assembly! {(self.code) {
            sub %rsp, {info.frame_size};
        }}
        self.frame = Frame::new(&f.name, info.ret.clone(), epilogue.clone(), info.frame_size, reserve_at);
        self.stack_bytes = 0;

        self.symbols.push_scope();
        let mut offset = 2 * WORD_SIZE;
        for (p, ty) in f.params.iter().zip(info.params.iter()) {
            self.symbols
                .declare_var(&p.name, VarInfo::new(Address::Frame(offset), ty.clone()))?;
            offset += self.symbols.size_of(ty)?;
        }

        let is_main = f.name == MAIN_FUNCTION;
        if is_main {
            self.init_globals(globals)?;
        }
        self.statements(&f.body)?;
        self.symbols.pop_scope();

        assembly! {(self.code) {
        ^{epilogue}:
        }}
        if is_main {
            assembly! {(self.code) {
                mov %rax, 0;
            }}
        }
        assembly! {(self.code) {
            mov %rsp, %rbp;
            pop %rbp;
            ret;
        }}

        self.widen_frame()
    }

    /// Grows the frame reservation if more was allocated than the prologue
    /// reserved.
    fn widen_frame(&mut self) -> CompilerResult<()> {
        let needed = align16(self.frame.reserved + self.frame.overflow);
        if needed > self.frame.reserved {
            warn!(
                "Function {}: frame of {} bytes is too small, widening to {}",
                self.frame.name, self.frame.reserved, needed
            );
            self.code[self.frame.reserve_at] = Inst::Sub(operand!(%rsp), operand!({ needed }));
            self.symbols.lookup_func_mut(&self.frame.name)?.frame_size = needed;
        }
        Ok(())
    }

    /// Reserves storage for a local of the given type. The reserved area is
    /// filled from its bottom up, so the latest local is nearest the frame
    /// base. Anything that does not fit goes below the reserved area.
    fn allocate(&mut self, ty: &ValueType) -> CompilerResult<Address> {
        let size = self.symbols.size_of(ty)?;
        let frame = &mut self.frame;
        if frame.used + size <= frame.reserved {
            let offset = frame.used - frame.reserved;
            frame.used += size;
            Ok(Address::Frame(offset))
        } else {
            frame.overflow += size;
            Ok(Address::Frame(-(frame.reserved + frame.overflow)))
        }
    }

    /// Returns a fresh label body; `purpose` makes the assembly readable.
    fn label(&mut self, purpose: &str) -> String {
        let id = self.labels;
        self.labels += 1;
        format!("{}_{}", purpose, id)
    }

    fn push_rax(&mut self) {
        assembly! {(self.code) {
            push %rax;
        }}
        self.stack_bytes += WORD_SIZE;
    }

    fn pop_rax(&mut self) {
        assembly! {(self.code) {
            pop %rax;
        }}
        self.stack_bytes -= WORD_SIZE;
    }

    fn pop_rcx(&mut self) {
        assembly! {(self.code) {
            pop %rcx;
        }}
        self.stack_bytes -= WORD_SIZE;
    }

    /// Calls a routine that follows the System V convention, padding the
    /// stack so that `rsp` is aligned to 16 bytes at the call.
    fn call_aligned(&mut self, target: &str) {
        let pad = self.stack_bytes % 16;
        if pad != 0 {
            assembly! {(self.code) {
                sub %rsp, {pad};
            }}
        }
        assembly! {(self.code) {
            call @{target};
        }}
        if pad != 0 {
            assembly! {(self.code) {
                add %rsp, {pad};
            }}
        }
    }

    /// Puts the sections around the generated functions.
    fn assemble(&mut self) {
        let mut listing = vec![Inst::IntelSyntax];
        listing.append(&mut self.read_only_data());
        listing.append(&mut self.writable_data());
        assembly! {(listing) {
            section ".text";
        }}
        listing.append(&mut self.code);
        listing.append(&mut self.runtime_helpers());
        assembly! {(listing) {
            section ".note.GNU-stack,\"\",@progbits";
        }}
        self.code = listing;
    }
}
