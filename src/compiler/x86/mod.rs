/*!
 # x86
 ## About
 This module provides a DSL that models the x86-64 assembly language, as
 accepted by the GNU assembler in Intel syntax, and the handful of
 instructions and directives the code generator needs.

 `assembly!` appends instructions to any buffer with a `push(Inst)` method.

 ## Example
 ```ignore
 assembly!{(code){
     mov %rax, %rcx;
     add %rax, %rax;
     push %rax;
 }}
 ```

## Syntax
1. `%<register>` - The `%` prefix indicates that the next token will be a register.
2. `{expression}` - This is an expression which will be evaluated and whose result
    will be used in the generated x86 assembly. This can be used to dynamically
    generate the literals that will be output but it can also be used to choose
    which register an operand names:

    ```ignore
        assembly!{(code){
            pop %{reg};   // where reg is of type Reg
        }};
    ```

3. `[%rbp-{offset}]`, `[%rsp+{offset}]`, `[%rax]` - word sized memory operands.
4. `[rel @{label}]` - memory addressed relative to the instruction pointer.
5. `*{operand}` - an `Operand` that was built elsewhere, such as the storage
    of a variable.
6. `@label` or `@{"label"}` - a global label.
7. `^label` or `^{"label"}` - a local label, emitted with a `.L` prefix so the
    assembler keeps it out of the symbol table. The code generator makes these
    unique by appending a counter.
8. `{{iterable of instructions}}` - injects any iterable which contains `Inst`. This
    allows x86 code generated in helper functions to be easily injected into an
    assembly macro.
 */

pub mod assembly;
