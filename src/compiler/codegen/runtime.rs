use crate::{
    assembly,
    compiler::{
        memory::stringpool::escape,
        x86::assembly::Inst,
    },
};

use super::Compiler;

pub(super) const FMT_INT: &str = ".Lfmt_int";
pub(super) const FMT_INT_NL: &str = ".Lfmt_int_nl";
pub(super) const FMT_STR: &str = ".Lfmt_str";
pub(super) const FMT_STR_NL: &str = ".Lfmt_str_nl";
pub(super) const FMT_NL: &str = ".Lfmt_nl";
pub(super) const STR_TRUE: &str = ".Lstr_true";
pub(super) const STR_FALSE: &str = ".Lstr_false";
pub(super) const STR_EMPTY: &str = ".Lstr_empty";

pub(super) const PRINTF: &str = "printf";
pub(super) const CONCAT: &str = "golite_concat";
pub(super) const STREQ: &str = "golite_streq";

/// Which runtime helpers a program calls. Only those are emitted.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RuntimeHelpers {
    pub concat: bool,
    pub streq: bool,
}

impl Compiler {
    /// Concatenates the strings in `rax` and `rcx` into a new string in `rax`.
    pub(super) fn concat(&mut self) {
        assembly! {(self.code) {
            mov %rdi, %rax;
            mov %rsi, %rcx;
        }}
        self.call_aligned(CONCAT);
        self.helpers.concat = true;
    }

    /// Sets `rax` to 1 if the strings in `rax` and `rcx` are equal and 0 otherwise.
    pub(super) fn streq(&mut self) {
        assembly! {(self.code) {
            mov %rdi, %rax;
            mov %rsi, %rcx;
        }}
        self.call_aligned(STREQ);
        self.helpers.streq = true;
    }

    pub(super) fn read_only_data(&self) -> Vec<Inst> {
        let mut code = vec![];
        assembly! {(code) {
            section ".rodata";
        }}
        for (label, value) in vec![
            (FMT_INT, "%ld "),
            (FMT_INT_NL, "%ld\\n"),
            (FMT_STR, "%s "),
            (FMT_STR_NL, "%s\\n"),
            (FMT_NL, "\\n"),
            (STR_TRUE, "true"),
            (STR_FALSE, "false"),
            (STR_EMPTY, ""),
        ] {
            code.push(Inst::DataString(label.into(), value.into()));
        }
        for (label, s) in self.strings.iter() {
            code.push(Inst::DataString(label, escape(s)));
        }
        code
    }

    pub(super) fn writable_data(&self) -> Vec<Inst> {
        let mut code = vec![];
        if self.globals.is_empty() {
            return code;
        }
        assembly! {(code) {
            section ".data";
        }}
        for (label, size) in self.globals.iter() {
            code.push(Inst::Zero(label.clone(), *size));
        }
        code
    }

    pub(super) fn runtime_helpers(&self) -> Vec<Inst> {
        let mut code = vec![];
        if self.helpers.concat {
            concat_helper(&mut code);
        }
        if self.helpers.streq {
            streq_helper(&mut code);
        }
        code
    }
}

/// golite_concat(rdi: a, rsi: b) -> rax: a new heap string holding `a` then `b`.
fn concat_helper(code: &mut Vec<Inst>) {
    assembly! {(code) {
    @{CONCAT}:
        push %rbp;
        mov %rbp, %rsp;
        push %rbx;
        push %r12;
        push %r13;
        sub %rsp, 8;
        mov %rbx, %rdi;
        mov %r12, %rsi;
        call @strlen;
        mov %r13, %rax;
        mov %rdi, %r12;
        call @strlen;
        add %rax, %r13;
        add %rax, 1;
        mov %rdi, %rax;
        call @malloc;
        mov %r13, %rax;
        mov %rdi, %rax;
        mov %rsi, %rbx;
        call @strcpy;
        mov %rdi, %r13;
        mov %rsi, %r12;
        call @strcat;
        mov %rax, %r13;
        add %rsp, 8;
        pop %r13;
        pop %r12;
        pop %rbx;
        pop %rbp;
        ret;
    }}
}

/// golite_streq(rdi: a, rsi: b) -> rax: 1 if `a` and `b` hold the same text.
fn streq_helper(code: &mut Vec<Inst>) {
    assembly! {(code) {
    @{STREQ}:
        push %rbp;
        mov %rbp, %rsp;
        call @strcmp;
        cmp %eax, 0;
        sete %al;
        movzx %rax, %al;
        pop %rbp;
        ret;
    }}
}
