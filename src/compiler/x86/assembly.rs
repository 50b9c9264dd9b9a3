use std::fmt::*;

/*
Assembly DSL
Registers are prefixed with %
Memory locations are within []
Each instruction is followed by a ;
Expressions to evaluate are in {}
Prebuilt operands are prefixed with *
Global labels are prefixed with @, local labels with ^
```
let x = 8;
assembly!(
    (buffer) {
        mov %rax, 4;
        mov %rcx, {x};
        mov [%rbp-{x}], %rcx;
        lea %rdi, [rel @{".Lfmt_int"}];
        jmp ^{"end_3"};
    ^{"end_3"}:
        ret;
    }
)
```

would translate to:
```
    mov rax, 4
    mov rcx, 8
    mov QWORD PTR [rbp-8], rcx
    lea rdi, [rip + .Lfmt_int]
    jmp .Lend_3
.Lend_3:
    ret
```

operand combinations:
binary:
%_, %_
%_, _
%_, @_
%_, ^_
%_, [_]
%_, *_
[_], %_
[_], _
*_, %_
 but not [_], [_]  as there are no x86 instructions that take two explicit memory operands

unary:
%_
@_
^_
[_]
*_
_
*/

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reg8 {
    Al,
}

impl Display for Reg8 {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        use Reg8::*;
        match self {
            Al => f.write_str("al"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reg32 {
    Eax,
}

impl Display for Reg32 {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        use Reg32::*;
        match self {
            Eax => f.write_str("eax"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reg64 {
    Rax,
    Rbx,
    Rcx,
    Rdx,
    Rsi,
    Rdi,
    Rsp,
    Rbp,
    R12,
    R13,
}

impl Display for Reg64 {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        use Reg64::*;
        match self {
            Rax => f.write_str("rax"),
            Rbx => f.write_str("rbx"),
            Rcx => f.write_str("rcx"),
            Rdx => f.write_str("rdx"),
            Rsi => f.write_str("rsi"),
            Rdi => f.write_str("rdi"),
            Rsp => f.write_str("rsp"),
            Rbp => f.write_str("rbp"),
            R12 => f.write_str("r12"),
            R13 => f.write_str("r13"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reg {
    R8(Reg8),
    R32(Reg32),
    R64(Reg64),
}

impl Display for Reg {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        use Reg::*;
        match self {
            R8(r8) => f.write_fmt(format_args!("{}", r8)),
            R32(r32) => f.write_fmt(format_args!("{}", r32)),
            R64(r64) => f.write_fmt(format_args!("{}", r64)),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DirectOperand {
    Integer(i64),
    Register(Reg),
    Label(String),
}

impl Display for DirectOperand {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        use DirectOperand::*;
        match self {
            Integer(i) => f.write_fmt(format_args!("{}", i)),
            Register(reg) => f.write_fmt(format_args!("{}", reg)),
            Label(lbl) => f.write_fmt(format_args!("{}", lbl)),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    Direct(DirectOperand),
    Memory(DirectOperand),
    IPRelativeMemory(String),
    MemoryAddr(Reg, i64),
}

impl Operand {
    pub fn is_memory(&self) -> bool {
        !matches!(self, Operand::Direct(_))
    }

    /// A word sized memory operand at `offset` from the frame base.
    pub fn frame(offset: i64) -> Operand {
        Operand::MemoryAddr(Reg::R64(Reg64::Rbp), offset)
    }

    /// A word sized memory operand at `offset` into the data labelled `label`.
    pub fn global(label: &str, offset: i64) -> Operand {
        if offset == 0 {
            Operand::IPRelativeMemory(label.into())
        } else {
            Operand::IPRelativeMemory(format!("{}+{}", label, offset))
        }
    }
}

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        use Operand::*;
        match self {
            Direct(d) => f.write_fmt(format_args!("{}", d)),
            Memory(mem) => f.write_fmt(format_args!("[{}]", mem)),
            IPRelativeMemory(mem) => f.write_fmt(format_args!("[rip + {}]", mem)),
            MemoryAddr(mem, d) => {
                if *d < 0 {
                    f.write_fmt(format_args!("[{}-{}]", mem, -d))
                } else if *d > 0 {
                    f.write_fmt(format_args!("[{}+{}]", mem, d))
                } else {
                    f.write_fmt(format_args!("[{}]", mem))
                }
            }
        }
    }
}

/// Memory operands are always a full word.
fn sized(o: &Operand) -> String {
    if o.is_memory() {
        format!("QWORD PTR {}", o)
    } else {
        format!("{}", o)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Inst {
    IntelSyntax,
    Section(String),
    Global(String),
    Zero(String, i64),
    DataString(String, String),
    Label(String),

    Jmp(Operand),
    Je(Operand),
    Jne(Operand),
    Call(Operand),
    Ret,
    Cqo,

    Push(Operand),
    Pop(Operand),
    Mov(Operand, Operand),
    Movzx(Operand, Operand),
    Lea(Operand, Operand),

    Add(Operand, Operand),
    Sub(Operand, Operand),
    IMul(Operand, Operand),
    IDiv(Operand),
    Neg(Operand),

    Cmp(Operand, Operand),
    Xor(Operand, Operand),

    Sete(Reg8),
    Setne(Reg8),
    Setl(Reg8),
    Setle(Reg8),
    Setg(Reg8),
    Setge(Reg8),
}

impl Display for Inst {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        use Inst::*;
        // Add separating newline?
        match self {
            Label(lbl) if !lbl.starts_with('.') => f.write_str("\n")?,
            _ => f.write_str("")?,
        };

        // Indent instruction?
        match self {
            Label(_) | IntelSyntax | Global(_) | Section(_) | Zero(..) | DataString(..) => (),
            _ => f.write_str("    ")?,
        };

        match self {
            IntelSyntax => f.write_str(".intel_syntax noprefix"),
            Section(section) => f.write_fmt(format_args!("\n.section {}", section)),
            Global(global) => f.write_fmt(format_args!(".globl {}", global)),
            Zero(lbl, size) => f.write_fmt(format_args!("{}: .zero {}", lbl, size)),
            DataString(lbl, value) => f.write_fmt(format_args!("{}: .string \"{}\"", lbl, value)),

            Jmp(a) => f.write_fmt(format_args!("jmp {}", a)),
            Je(a) => f.write_fmt(format_args!("je {}", a)),
            Jne(a) => f.write_fmt(format_args!("jne {}", a)),
            Call(a) => f.write_fmt(format_args!("call {}", a)),
            Ret => f.write_str("ret"),
            Cqo => f.write_str("cqo"),

            Push(a) => f.write_fmt(format_args!("push {}", sized(a))),
            Pop(a) => f.write_fmt(format_args!("pop {}", sized(a))),

            Mov(a, b) => f.write_fmt(format_args!("mov {}, {}", sized(a), sized(b))),
            Movzx(a, b) => f.write_fmt(format_args!("movzx {}, {}", a, b)),
            Lea(a, b) => f.write_fmt(format_args!("lea {}, {}", a, b)),

            Add(a, b) => f.write_fmt(format_args!("add {}, {}", sized(a), sized(b))),
            Sub(a, b) => f.write_fmt(format_args!("sub {}, {}", sized(a), sized(b))),
            IMul(a, b) => f.write_fmt(format_args!("imul {}, {}", a, sized(b))),
            IDiv(a) => f.write_fmt(format_args!("idiv {}", sized(a))),
            Neg(a) => f.write_fmt(format_args!("neg {}", sized(a))),
            Cmp(a, b) => f.write_fmt(format_args!("cmp {}, {}", sized(a), sized(b))),
            Xor(a, b) => f.write_fmt(format_args!("xor {}, {}", sized(a), sized(b))),

            Sete(a) => f.write_fmt(format_args!("sete {}", a)),
            Setne(a) => f.write_fmt(format_args!("setne {}", a)),
            Setl(a) => f.write_fmt(format_args!("setl {}", a)),
            Setle(a) => f.write_fmt(format_args!("setle {}", a)),
            Setg(a) => f.write_fmt(format_args!("setg {}", a)),
            Setge(a) => f.write_fmt(format_args!("setge {}", a)),

            Label(lbl) => f.write_fmt(format_args!("{}:", lbl)),
        }
    }
}

#[macro_export]
macro_rules! unit_op {
    (ret) => {
        $crate::compiler::x86::assembly::Inst::Ret
    };
    (cqo) => {
        $crate::compiler::x86::assembly::Inst::Cqo
    };
}

#[macro_export]
macro_rules! unary_op {
    (jmp) => {
        $crate::compiler::x86::assembly::Inst::Jmp
    };
    (je) => {
        $crate::compiler::x86::assembly::Inst::Je
    };
    (jne) => {
        $crate::compiler::x86::assembly::Inst::Jne
    };
    (call) => {
        $crate::compiler::x86::assembly::Inst::Call
    };
    (push) => {
        $crate::compiler::x86::assembly::Inst::Push
    };
    (pop) => {
        $crate::compiler::x86::assembly::Inst::Pop
    };
    (idiv) => {
        $crate::compiler::x86::assembly::Inst::IDiv
    };
    (neg) => {
        $crate::compiler::x86::assembly::Inst::Neg
    };
}

#[macro_export]
macro_rules! binary_op {
    (mov) => {
        $crate::compiler::x86::assembly::Inst::Mov
    };
    (movzx) => {
        $crate::compiler::x86::assembly::Inst::Movzx
    };
    (lea) => {
        $crate::compiler::x86::assembly::Inst::Lea
    };
    (add) => {
        $crate::compiler::x86::assembly::Inst::Add
    };
    (sub) => {
        $crate::compiler::x86::assembly::Inst::Sub
    };
    (imul) => {
        $crate::compiler::x86::assembly::Inst::IMul
    };
    (cmp) => {
        $crate::compiler::x86::assembly::Inst::Cmp
    };
    (xor) => {
        $crate::compiler::x86::assembly::Inst::Xor
    };
}

#[macro_export]
macro_rules! reg8 {
    (al) => {
        $crate::compiler::x86::assembly::Reg8::Al
    };
}

#[macro_export]
macro_rules! register {
    (rax) => {
        $crate::compiler::x86::assembly::Reg::R64($crate::compiler::x86::assembly::Reg64::Rax)
    };
    (rbx) => {
        $crate::compiler::x86::assembly::Reg::R64($crate::compiler::x86::assembly::Reg64::Rbx)
    };
    (rcx) => {
        $crate::compiler::x86::assembly::Reg::R64($crate::compiler::x86::assembly::Reg64::Rcx)
    };
    (rdx) => {
        $crate::compiler::x86::assembly::Reg::R64($crate::compiler::x86::assembly::Reg64::Rdx)
    };
    (rsi) => {
        $crate::compiler::x86::assembly::Reg::R64($crate::compiler::x86::assembly::Reg64::Rsi)
    };
    (rdi) => {
        $crate::compiler::x86::assembly::Reg::R64($crate::compiler::x86::assembly::Reg64::Rdi)
    };
    (rsp) => {
        $crate::compiler::x86::assembly::Reg::R64($crate::compiler::x86::assembly::Reg64::Rsp)
    };
    (rbp) => {
        $crate::compiler::x86::assembly::Reg::R64($crate::compiler::x86::assembly::Reg64::Rbp)
    };
    (r12) => {
        $crate::compiler::x86::assembly::Reg::R64($crate::compiler::x86::assembly::Reg64::R12)
    };
    (r13) => {
        $crate::compiler::x86::assembly::Reg::R64($crate::compiler::x86::assembly::Reg64::R13)
    };
    (eax) => {
        $crate::compiler::x86::assembly::Reg::R32($crate::compiler::x86::assembly::Reg32::Eax)
    };
    (al) => {
        $crate::compiler::x86::assembly::Reg::R8($crate::compiler::x86::assembly::Reg8::Al)
    };
}

#[macro_export]
macro_rules! operand {
    // memory
    ([%$reg:tt-$d:literal]) => {
        $crate::compiler::x86::assembly::Operand::MemoryAddr($crate::register!($reg), -$d)
    };
    ([%$reg:tt+$d:literal]) => {
        $crate::compiler::x86::assembly::Operand::MemoryAddr($crate::register!($reg), $d)
    };
    ([%{$reg:expr}-{$e:expr}]) => {
        $crate::compiler::x86::assembly::Operand::MemoryAddr($reg, -$e)
    };
    ([%$reg:tt-{$e:expr}]) => {
        $crate::compiler::x86::assembly::Operand::MemoryAddr($crate::register!($reg), -$e)
    };
    ([%{$reg:expr}+{$e:expr}]) => {
        $crate::compiler::x86::assembly::Operand::MemoryAddr($reg, $e)
    };
    ([%$reg:tt+{$e:expr}]) => {
        $crate::compiler::x86::assembly::Operand::MemoryAddr($crate::register!($reg), $e)
    };
    ([%$e:tt]) => {
        $crate::compiler::x86::assembly::Operand::Memory(
            $crate::compiler::x86::assembly::DirectOperand::Register($crate::register!($e)),
        )
    };
    ([rel @{$e:expr}]) => {
        $crate::compiler::x86::assembly::Operand::IPRelativeMemory(format!("{}", $e))
    };
    ([rel @$e:tt]) => {
        $crate::compiler::x86::assembly::Operand::IPRelativeMemory(stringify!($e).into())
    };
    ({$e:expr}) => {
        $crate::compiler::x86::assembly::Operand::Direct(
            $crate::compiler::x86::assembly::DirectOperand::Integer($e),
        )
    };

    // prebuilt
    (*{$e:expr}) => {
        $e
    };

    // register
    (%{$reg:expr}) => {
        $crate::compiler::x86::assembly::Operand::Direct(
            $crate::compiler::x86::assembly::DirectOperand::Register($reg),
        )
    };
    (%$reg:tt) => {
        $crate::compiler::x86::assembly::Operand::Direct(
            $crate::compiler::x86::assembly::DirectOperand::Register($crate::register!($reg)),
        )
    };
    ($e:literal) => {
        $crate::compiler::x86::assembly::Operand::Direct(
            $crate::compiler::x86::assembly::DirectOperand::Integer($e),
        )
    };
    (@{$e:expr}) => {
        $crate::compiler::x86::assembly::Operand::Direct(
            $crate::compiler::x86::assembly::DirectOperand::Label(format!("{}", $e)),
        )
    };
    (@$e:tt) => {
        $crate::compiler::x86::assembly::Operand::Direct(
            $crate::compiler::x86::assembly::DirectOperand::Label(stringify!($e).into()),
        )
    };
    (^{$e:expr}) => {
        $crate::compiler::x86::assembly::Operand::Direct(
            $crate::compiler::x86::assembly::DirectOperand::Label(format!(".L{}", $e)),
        )
    };
    (^$e:tt) => {
        $crate::compiler::x86::assembly::Operand::Direct(
            $crate::compiler::x86::assembly::DirectOperand::Label(format!(".L{}", stringify!($e))),
        )
    };
}

#[macro_export]
macro_rules! assembly {
    (($buf:expr) {}) => {
    };

    /********************/
    /*  MACRO OPERATIONS */
    /********************/
    // Append another set of instructions
    (($buf:expr) {{{$is:expr}} $($tail:tt)*}) => {
        for inst in $is.iter() {
            $buf.push(inst.clone());
        }
        $crate::assembly!(($buf) {$($tail)*})
    };

    /********************/
    /*     LABELS       */
    /********************/
    (($buf:expr) {^{$label:expr}: $($tail:tt)*}) => {
        $buf.push($crate::compiler::x86::assembly::Inst::Label(format!(".L{}", $label)));
        $crate::assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {^$label:tt: $($tail:tt)*}) => {
        $buf.push($crate::compiler::x86::assembly::Inst::Label(format!(".L{}", stringify!($label))));
        $crate::assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {@{$label:expr}: $($tail:tt)*}) => {
        $buf.push($crate::compiler::x86::assembly::Inst::Label(format!("{}", $label)));
        $crate::assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {@$label:tt: $($tail:tt)*}) => {
        $buf.push($crate::compiler::x86::assembly::Inst::Label(stringify!($label).into()));
        $crate::assembly!(($buf) {$($tail)*})
    };

    /********************/
    /* UNIT OPERATORS */
    /********************/
    (($buf:expr) {$inst:tt; $($tail:tt)*}) => {
        $buf.push($crate::unit_op!($inst));
        $crate::assembly!(($buf) {$($tail)*})
    };

    /********************/
    /* Special Ops      */
    /********************/
    (($buf:expr) {section $sec:literal; $($tail:tt)*}) => {
        $buf.push($crate::compiler::x86::assembly::Inst::Section($sec.into()));
        $crate::assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {global {$glbl:expr}; $($tail:tt)*}) => {
        $buf.push($crate::compiler::x86::assembly::Inst::Global(format!("{}", $glbl)));
        $crate::assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {global $glbl:tt; $($tail:tt)*}) => {
        $buf.push($crate::compiler::x86::assembly::Inst::Global(stringify!($glbl).into()));
        $crate::assembly!(($buf) {$($tail)*})
    };

    (($buf:expr) {sete % $a:tt; $($tail:tt)*}) => {
        $buf.push($crate::compiler::x86::assembly::Inst::Sete($crate::reg8!($a)));
        $crate::assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {setne % $a:tt; $($tail:tt)*}) => {
        $buf.push($crate::compiler::x86::assembly::Inst::Setne($crate::reg8!($a)));
        $crate::assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {setl % $a:tt; $($tail:tt)*}) => {
        $buf.push($crate::compiler::x86::assembly::Inst::Setl($crate::reg8!($a)));
        $crate::assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {setle % $a:tt; $($tail:tt)*}) => {
        $buf.push($crate::compiler::x86::assembly::Inst::Setle($crate::reg8!($a)));
        $crate::assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {setg % $a:tt; $($tail:tt)*}) => {
        $buf.push($crate::compiler::x86::assembly::Inst::Setg($crate::reg8!($a)));
        $crate::assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {setge % $a:tt; $($tail:tt)*}) => {
        $buf.push($crate::compiler::x86::assembly::Inst::Setge($crate::reg8!($a)));
        $crate::assembly!(($buf) {$($tail)*})
    };

    /********************/
    /* UNARY OPERATORS */
    /********************/
    (($buf:expr) {$inst:tt $a:tt; $($tail:tt)*}) => {
        $buf.push($crate::unary_op!($inst)($crate::operand!($a)));
        $crate::assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {$inst:tt % $a:tt; $($tail:tt)*}) => {
        $buf.push($crate::unary_op!($inst)($crate::operand!(%$a)));
        $crate::assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {$inst:tt * $a:tt; $($tail:tt)*}) => {
        $buf.push($crate::unary_op!($inst)($crate::operand!(*$a)));
        $crate::assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {$inst:tt [ $($mem:tt)+ ]; $($tail:tt)*}) => {
        $buf.push($crate::unary_op!($inst)($crate::operand!([$($mem)+])));
        $crate::assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {$inst:tt @ $a:tt; $($tail:tt)*}) => {
        $buf.push($crate::unary_op!($inst)($crate::operand!(@$a)));
        $crate::assembly!(($buf) {$($tail)*})
    };
    (($buf:expr) {$inst:tt ^ $a:tt; $($tail:tt)*}) => {
        $buf.push($crate::unary_op!($inst)($crate::operand!(^$a)));
        $crate::assembly!(($buf) {$($tail)*})
    };

    /********************/
    /* BINARY OPERATORS */
    /********************/
    // reg, literal
    (($buf:expr) {$inst:tt % $a:tt, $b:tt; $($tail:tt)*}) => {
        $buf.push($crate::binary_op!($inst)($crate::operand!(% $a), $crate::operand!($b)));
        $crate::assembly!(($buf) {$($tail)*})
    };
    // reg, reg
    (($buf:expr) {$inst:tt % $a:tt, % $b:tt; $($tail:tt)*}) => {
        $buf.push($crate::binary_op!($inst)($crate::operand!(% $a), $crate::operand!(% $b)));
        $crate::assembly!(($buf) {$($tail)*})
    };
    // reg, prebuilt operand
    (($buf:expr) {$inst:tt % $a:tt, * $b:tt; $($tail:tt)*}) => {
        $buf.push($crate::binary_op!($inst)($crate::operand!(% $a), $crate::operand!(* $b)));
        $crate::assembly!(($buf) {$($tail)*})
    };
    // reg, global label
    (($buf:expr) {$inst:tt % $a:tt, @ $b:tt; $($tail:tt)*}) => {
        $buf.push($crate::binary_op!($inst)($crate::operand!(% $a), $crate::operand!(@ $b)));
        $crate::assembly!(($buf) {$($tail)*})
    };
    // reg, local label
    (($buf:expr) {$inst:tt % $a:tt, ^ $b:tt; $($tail:tt)*}) => {
        $buf.push($crate::binary_op!($inst)($crate::operand!(% $a), $crate::operand!(^ $b)));
        $crate::assembly!(($buf) {$($tail)*})
    };
    // reg, mem
    (($buf:expr) {$inst:tt % $a:tt, [ $($mem:tt)+ ]; $($tail:tt)*}) => {
        $buf.push($crate::binary_op!($inst)($crate::operand!(%$a), $crate::operand!([$($mem)+])));
        $crate::assembly!(($buf) {$($tail)*})
    };
    // mem, literal
    (($buf:expr) {$inst:tt [$($a:tt)+], $b:tt; $($tail:tt)*}) => {
        $buf.push($crate::binary_op!($inst)($crate::operand!([$($a)+]), $crate::operand!($b)));
        $crate::assembly!(($buf) {$($tail)*})
    };
    // mem, reg
    (($buf:expr) {$inst:tt [$($a:tt)+], % $b:tt; $($tail:tt)*}) => {
        $buf.push($crate::binary_op!($inst)($crate::operand!([$($a)+]), $crate::operand!(% $b)));
        $crate::assembly!(($buf) {$($tail)*})
    };
    // prebuilt operand, reg
    (($buf:expr) {$inst:tt * $a:tt, % $b:tt; $($tail:tt)*}) => {
        $buf.push($crate::binary_op!($inst)($crate::operand!(* $a), $crate::operand!(% $b)));
        $crate::assembly!(($buf) {$($tail)*})
    };
    // prebuilt operand, literal
    (($buf:expr) {$inst:tt * $a:tt, $b:tt; $($tail:tt)*}) => {
        $buf.push($crate::binary_op!($inst)($crate::operand!(* $a), $crate::operand!($b)));
        $crate::assembly!(($buf) {$($tail)*})
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly;

    fn render(code: &[Inst]) -> Vec<String> {
        code.iter().map(|i| format!("{}", i)).collect()
    }

    #[test]
    fn test_registers_and_literals() {
        let x: i64 = 8;
        let mut code = vec![];
        assembly! {(code) {
            mov %rax, 4;
            mov %rcx, {x};
            add %rax, %rcx;
            push %rax;
            pop %rcx;
            cqo;
            idiv %rcx;
            ret;
        }}
        assert_eq!(
            render(&code),
            vec![
                "    mov rax, 4",
                "    mov rcx, 8",
                "    add rax, rcx",
                "    push rax",
                "    pop rcx",
                "    cqo",
                "    idiv rcx",
                "    ret",
            ]
        );
    }

    #[test]
    fn test_memory_operands() {
        let off: i64 = 16;
        let slot = Operand::frame(-24);
        let mut code = vec![];
        assembly! {(code) {
            mov [%rbp-{off}], %rax;
            mov %rax, [%rbp+{off}];
            mov %rcx, [%rax];
            mov [%rsp+8], %rcx;
            mov %rax, *{slot.clone()};
            mov *{slot}, %rcx;
            lea %rdi, [rel @{".Lfmt_int"}];
            mov %rax, *{Operand::global("golite_global_p", 8)};
        }}
        assert_eq!(
            render(&code),
            vec![
                "    mov QWORD PTR [rbp-16], rax",
                "    mov rax, QWORD PTR [rbp+16]",
                "    mov rcx, QWORD PTR [rax]",
                "    mov QWORD PTR [rsp+8], rcx",
                "    mov rax, QWORD PTR [rbp-24]",
                "    mov QWORD PTR [rbp-24], rcx",
                "    lea rdi, [rip + .Lfmt_int]",
                "    mov rax, QWORD PTR [rip + golite_global_p+8]",
            ]
        );
    }

    #[test]
    fn test_labels_and_jumps() {
        let id = 3;
        let mut code = vec![];
        assembly! {(code) {
            section ".text";
            global {"main"};
        @main:
            cmp %rax, 0;
            je ^{format!("else_{}", id)};
            call @printf;
            call @{"golite_concat"};
        ^{format!("else_{}", id)}:
            sete %al;
            movzx %rax, %al;
        }}
        assert_eq!(
            render(&code),
            vec![
                "\n.section .text",
                ".globl main",
                "\nmain:",
                "    cmp rax, 0",
                "    je .Lelse_3",
                "    call printf",
                "    call golite_concat",
                ".Lelse_3:",
                "    sete al",
                "    movzx rax, al",
            ]
        );
    }

    #[test]
    fn test_relational_and_arithmetic() {
        let mut code = vec![];
        assembly! {(code) {
            cmp %rax, %rcx;
            setne %al;
            setl %al;
            setle %al;
            setg %al;
            setge %al;
            imul %rax, %rcx;
            sub %rax, %rcx;
            xor %rax, %rax;
        }}
        assert_eq!(
            render(&code),
            vec![
                "    cmp rax, rcx",
                "    setne al",
                "    setl al",
                "    setle al",
                "    setg al",
                "    setge al",
                "    imul rax, rcx",
                "    sub rax, rcx",
                "    xor rax, rax",
            ]
        );
    }

    #[test]
    fn test_inject_instructions() {
        let mut inner = vec![];
        assembly! {(inner) {
            neg %rax;
        }}
        let mut code = vec![];
        assembly! {(code) {
            mov %rax, 1;
            {{inner}}
            xor %rax, 1;
        }}
        assert_eq!(
            render(&code),
            vec!["    mov rax, 1", "    neg rax", "    xor rax, 1"]
        );
    }
}
