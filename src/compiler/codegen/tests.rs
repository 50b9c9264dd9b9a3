#[cfg(test)]
mod tests {
    use std::mem::discriminant;

    use crate::compiler::{
        lexer::{tokens::Token, Lexer},
        parser::parse,
        Compiler, CompilerError, RuntimeHelpers,
    };

    fn tokens(text: &str) -> Vec<Token> {
        Lexer::new(text)
            .tokenize()
            .into_iter()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    fn compile(text: &str) -> Result<Compiler, CompilerError> {
        let program = parse(tokens(text)).unwrap();
        Compiler::compile(&program)
    }

    fn render(compiler: &Compiler) -> Vec<String> {
        let mut out = vec![];
        compiler.print(&mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|l| l.to_string())
            .collect()
    }

    fn assemble(text: &str) -> Vec<String> {
        render(&compile(text).unwrap())
    }

    /// Wraps `body` into `main` of a program which imports fmt.
    fn program(body: &str) -> String {
        format!(
            "package main\nimport \"fmt\"\nfunc main() {{\n{}\n}}\n",
            body
        )
    }

    fn contains_seq(lines: &[String], seq: &[&str]) -> bool {
        lines
            .windows(seq.len())
            .any(|w| w.iter().zip(seq.iter()).all(|(l, s)| l == s))
    }

    fn position(lines: &[String], prefix: &str) -> usize {
        lines
            .iter()
            .position(|l| l.starts_with(prefix))
            .unwrap_or_else(|| panic!("no line starting with {:?}", prefix))
    }

    /// The amount each prologue reserves, in order of the functions.
    fn frames(lines: &[String]) -> Vec<i64> {
        lines
            .windows(2)
            .filter(|w| w[0] == "    mov rbp, rsp" && w[1].starts_with("    sub rsp, "))
            .map(|w| {
                w[1].trim_start_matches("    sub rsp, ")
                    .parse::<i64>()
                    .unwrap()
            })
            .collect()
    }

    const POINT: &str = "type Point struct {\n x int\n y int\n}\n";

    #[test]
    fn test_frame_reservation_is_aligned() {
        for (body, expected) in vec![
            ("", 0),
            ("a := 1", 16),
            ("a := 1\nb := 2\nc := 3", 32),
            ("var p Point", 16),
            ("var s string\nvar p Point", 32),
            (
                "if true {\n x := 1\n}\nfor i := 0; i < 3; i++ {\n y := i\n}",
                32,
            ),
            ("{\n a := 1\n}\n{\n b := 2\n}", 16),
        ] {
            let text = format!("package main\n{}func main() {{\n{}\n}}\n", POINT, body);
            let lines = assemble(&text);
            let frames = frames(&lines);
            assert_eq!(frames, vec![expected], "{}", body);
            assert!(frames.iter().all(|f| f % 16 == 0));
        }
    }

    #[test]
    fn test_locals_fill_frame_from_the_bottom() {
        let lines = assemble(&program("a := 1\nb := 2\nc := 3"));
        assert!(contains_seq(
            &lines,
            &[
                "    mov rax, 1",
                "    mov QWORD PTR [rbp-32], rax",
                "    mov rax, 2",
                "    mov QWORD PTR [rbp-24], rax",
                "    mov rax, 3",
                "    mov QWORD PTR [rbp-16], rax",
            ]
        ));
    }

    #[test]
    fn test_main_epilogue() {
        let lines = assemble(&program("return"));
        let epilogue = position(&lines, ".Lepilogue_");
        assert_eq!(lines[epilogue - 1], format!("    jmp {}", lines[epilogue].trim_end_matches(':')));
        assert_eq!(
            &lines[epilogue + 1..epilogue + 5],
            &["    mov rax, 0", "    mov rsp, rbp", "    pop rbp", "    ret"]
        );
    }

    #[test]
    fn test_read_only_data_layout() {
        let lines = assemble(&program("fmt.Println(\"hi\", \"yo\", \"hi\")"));
        let data = lines
            .iter()
            .filter(|l| !l.is_empty())
            .take(12)
            .cloned()
            .collect::<Vec<_>>();
        assert_eq!(
            data,
            vec![
                ".intel_syntax noprefix",
                ".section .rodata",
                ".Lfmt_int: .string \"%ld \"",
                ".Lfmt_int_nl: .string \"%ld\\n\"",
                ".Lfmt_str: .string \"%s \"",
                ".Lfmt_str_nl: .string \"%s\\n\"",
                ".Lfmt_nl: .string \"\\n\"",
                ".Lstr_true: .string \"true\"",
                ".Lstr_false: .string \"false\"",
                ".Lstr_empty: .string \"\"",
                ".Lstr_0: .string \"hi\"",
                ".Lstr_1: .string \"yo\"",
            ]
        );
        assert!(!lines.iter().any(|l| l.starts_with(".Lstr_2")));
        assert_eq!(lines.last().unwrap(), ".section .note.GNU-stack,\"\",@progbits");
    }

    #[test]
    fn test_string_literals_are_escaped() {
        let lines = assemble(&program("fmt.Println(\"a\\tb\\\\c\\\"d\\n\")"));
        assert!(lines.contains(&".Lstr_0: .string \"a\\tb\\\\c\\\"d\\n\"".to_string()));
    }

    #[test]
    fn test_println_formats() {
        for (body, expected) in vec![
            (
                "fmt.Println()",
                vec!["    lea rdi, [rip + .Lfmt_nl]", "    mov rax, 0", "    call printf"],
            ),
            (
                "fmt.Println(7)",
                vec![
                    "    mov rax, 7",
                    "    mov rsi, rax",
                    "    lea rdi, [rip + .Lfmt_int_nl]",
                    "    mov rax, 0",
                    "    call printf",
                ],
            ),
            (
                "fmt.Println(7, \"x\")",
                vec![
                    "    mov rax, 7",
                    "    mov rsi, rax",
                    "    lea rdi, [rip + .Lfmt_int]",
                    "    mov rax, 0",
                    "    call printf",
                    "    lea rax, [rip + .Lstr_0]",
                    "    mov rsi, rax",
                    "    lea rdi, [rip + .Lfmt_str_nl]",
                ],
            ),
            (
                "fmt.Println(true)",
                vec![
                    "    mov rax, 1",
                    "    cmp rax, 0",
                    "    je .Lprint_false_1",
                    "    lea rsi, [rip + .Lstr_true]",
                    "    jmp .Lprint_end_2",
                    ".Lprint_false_1:",
                    "    lea rsi, [rip + .Lstr_false]",
                    ".Lprint_end_2:",
                    "    lea rdi, [rip + .Lfmt_str_nl]",
                ],
            ),
        ] {
            let lines = assemble(&program(body));
            assert!(contains_seq(&lines, &expected), "{}", body);
        }
    }

    #[test]
    fn test_short_circuit_skips_right_operand() {
        for (op, branch) in vec![("&&", "    je .Land_false_"), ("||", "    jne .Lor_true_")] {
            let text = format!(
                "package main\nimport \"fmt\"\nfunc check() bool {{\n fmt.Println(\"checked\")\n return true\n}}\nfunc main() {{\n ok := false {} check()\n fmt.Println(ok)\n}}\n",
                op
            );
            let lines = assemble(&text);
            let main = position(&lines, "main:");
            let branch = main + position(&lines[main..], branch);
            let call = main + position(&lines[main..], "    call golite_fn_check");
            assert!(branch < call, "{}", op);

            let target = lines[branch].split(' ').last().unwrap().to_string();
            let label = main + position(&lines[main..], &format!("{}:", target));
            assert!(call < label, "{}", op);
        }
    }

    #[test]
    fn test_arithmetic_and_comparison() {
        for (body, expected) in vec![
            (
                "x := 7 - 2",
                vec![
                    "    mov rax, 7",
                    "    push rax",
                    "    mov rax, 2",
                    "    mov rcx, rax",
                    "    pop rax",
                    "    sub rax, rcx",
                ],
            ),
            ("x := 7 / 2", vec!["    cqo", "    idiv rcx"]),
            ("x := 7 % 2", vec!["    cqo", "    idiv rcx", "    mov rax, rdx"]),
            (
                "x := 1 <= 2",
                vec!["    cmp rax, rcx", "    setle al", "    movzx rax, al"],
            ),
            (
                "x := !true",
                vec!["    mov rax, 1", "    cmp rax, 0", "    sete al", "    movzx rax, al"],
            ),
            ("x := -5", vec!["    mov rax, 5", "    neg rax"]),
            (
                "x := true == false",
                vec!["    cmp rax, rcx", "    sete al"],
            ),
        ] {
            let lines = assemble(&program(body));
            assert!(contains_seq(&lines, &expected), "{}", body);
        }
    }

    #[test]
    fn test_runtime_helpers_only_when_used() {
        for (body, expected) in vec![
            ("x := 1 + 2", RuntimeHelpers::default()),
            (
                "s := \"a\" + \"b\"\ns += \"c\"",
                RuntimeHelpers {
                    concat: true,
                    streq: false,
                },
            ),
            (
                "b := \"a\" != \"b\"",
                RuntimeHelpers {
                    concat: false,
                    streq: true,
                },
            ),
            (
                "b := \"a\" + \"b\" == \"ab\"",
                RuntimeHelpers {
                    concat: true,
                    streq: true,
                },
            ),
        ] {
            let compiler = compile(&program(body)).unwrap();
            assert_eq!(compiler.used_helpers(), expected, "{}", body);

            let lines = render(&compiler);
            let count = |label: &str| lines.iter().filter(|l| *l == label).count();
            assert_eq!(count("golite_concat:"), expected.concat as usize, "{}", body);
            assert_eq!(count("golite_streq:"), expected.streq as usize, "{}", body);
        }
    }

    #[test]
    fn test_string_inequality_complements() {
        let lines = assemble(&program("b := \"a\" != \"b\""));
        assert!(contains_seq(
            &lines,
            &[
                "    mov rdi, rax",
                "    mov rsi, rcx",
                "    call golite_streq",
                "    xor rax, 1",
            ]
        ));
    }

    #[test]
    fn test_struct_fields() {
        let text = format!(
            "package main\nimport \"fmt\"\n{}func main() {{\n p := Point{{3, 4}}\n fmt.Println(p.y)\n}}\n",
            POINT
        );
        let compiler = compile(&text).unwrap();
        let point = compiler.symbol_table().lookup_struct("Point").unwrap();
        assert_eq!(point.offset_of("x"), Some(0));
        assert_eq!(point.offset_of("y"), Some(8));
        assert_eq!(point.size(), 16);

        let lines = render(&compiler);
        assert!(contains_seq(
            &lines,
            &[
                "    mov rax, 3",
                "    push rax",
                "    mov rax, 4",
                "    push rax",
                "    pop rax",
                "    mov QWORD PTR [rbp-8], rax",
                "    pop rax",
                "    mov QWORD PTR [rbp-16], rax",
                "    mov rax, QWORD PTR [rbp-8]",
                "    mov rsi, rax",
            ]
        ));
    }

    #[test]
    fn test_struct_keyed_literal_and_copy() {
        let text = format!(
            "package main\n{}func main() {{\n p := Point{{y: 7}}\n q := p\n q.x = q.y\n}}\n",
            POINT
        );
        let lines = assemble(&text);
        assert_eq!(frames(&lines), vec![32]);
        assert!(contains_seq(
            &lines,
            &[
                "    mov rax, 0",
                "    push rax",
                "    mov rax, 7",
                "    push rax",
                "    pop rax",
                "    mov QWORD PTR [rbp-24], rax",
                "    pop rax",
                "    mov QWORD PTR [rbp-32], rax",
                "    mov rax, QWORD PTR [rbp-32]",
                "    mov QWORD PTR [rbp-16], rax",
                "    mov rax, QWORD PTR [rbp-24]",
                "    mov QWORD PTR [rbp-8], rax",
                "    mov rax, QWORD PTR [rbp-8]",
                "    mov QWORD PTR [rbp-16], rax",
            ]
        ));
    }

    #[test]
    fn test_user_function_call() {
        let text = "package main\nimport \"fmt\"\nfunc add(a int, b int) int {\n return a + b\n}\nfunc main() {\n x := add(2, 3)\n fmt.Println(x)\n}\n";
        let compiler = compile(text).unwrap();
        let add = compiler.symbol_table().lookup_func("add").unwrap();
        assert_eq!(add.params.len(), 2);
        assert_eq!(add.ret, crate::compiler::memory::ValueType::Int);

        let lines = render(&compiler);
        assert!(contains_seq(
            &lines,
            &[
                "    mov rax, QWORD PTR [rbp+16]",
                "    push rax",
                "    mov rax, QWORD PTR [rbp+24]",
                "    mov rcx, rax",
                "    pop rax",
                "    add rax, rcx",
                "    jmp .Lepilogue_0",
            ]
        ));
        assert!(contains_seq(
            &lines,
            &[
                "    sub rsp, 16",
                "    mov rax, 2",
                "    mov QWORD PTR [rsp], rax",
                "    mov rax, 3",
                "    mov QWORD PTR [rsp+8], rax",
                "    call golite_fn_add",
                "    add rsp, 16",
                "    mov QWORD PTR [rbp-16], rax",
            ]
        ));
    }

    #[test]
    fn test_function_symbols_are_prefixed() {
        let text = "package main\nfunc rcx() int {\n return 7\n}\nfunc main() {\n x := rcx()\n}\n";
        let lines = assemble(text);
        assert!(lines.contains(&".globl golite_fn_rcx".to_string()));
        assert!(lines.contains(&"golite_fn_rcx:".to_string()));
        assert!(lines.contains(&"    call golite_fn_rcx".to_string()));
        assert!(!lines.iter().any(|l| l == "rcx:" || l == "    call rcx"));
        assert!(lines.contains(&".globl main".to_string()));
        assert!(lines.contains(&"main:".to_string()));
    }

    #[test]
    fn test_missing_return() {
        for text in vec![
            "package main\nfunc f() int {\n}\nfunc main() {\n}\n",
            "package main\nfunc f(a int) int {\n if a > 0 {\n  return 1\n }\n}\nfunc main() {\n}\n",
            "package main\nfunc f(a int) bool {\n for a < 3 {\n  return true\n }\n}\nfunc main() {\n}\n",
        ] {
            let err = compile(text).unwrap_err();
            assert_eq!(err.root(), &CompilerError::MissingReturn("f".into()), "{}", text);
        }

        for text in vec![
            "package main\nfunc f(a int) int {\n if a > 0 {\n  return 1\n } else {\n  return 2\n }\n}\nfunc main() {\n}\n",
            "package main\nfunc f() int {\n for {\n }\n}\nfunc main() {\n}\n",
            "package main\nfunc f() int {\n {\n  return 1\n }\n}\nfunc main() {\n}\n",
            "package main\nfunc f() {\n}\nfunc main() {\n}\n",
        ] {
            assert!(compile(text).is_ok(), "{}", text);
        }
    }

    #[test]
    fn test_local_copy_of_package_struct() {
        let text = "package main\ntype T3 struct {\n a int\n b int\n c int\n}\nvar gp = T3{1, 2, 3}\nfunc main() {\n q := gp\n}\n";
        let lines = assemble(text);
        assert_eq!(frames(&lines), vec![32]);
        assert!(contains_seq(
            &lines,
            &[
                "    mov rax, QWORD PTR [rip + golite_global_gp]",
                "    mov QWORD PTR [rbp-32], rax",
            ]
        ));
    }

    #[test]
    fn test_widen_frame() {
        use crate::compiler::{
            codegen::Frame,
            memory::{Address, FuncInfo, ValueType},
            x86::assembly::Inst,
        };
        use crate::operand;

        let mut compiler = Compiler::new();
        compiler.symbols.push_scope();
        compiler
            .symbols
            .declare_func(
                "f",
                FuncInfo {
                    frame_size: 16,
                    ret: ValueType::Void,
                    params: vec![],
                },
            )
            .unwrap();
        compiler.code.push(Inst::Sub(operand!(%rsp), operand!({ 16 })));
        compiler.frame = Frame::new("f", ValueType::Void, "epilogue_0".into(), 16, 0);

        let slots = (0..3)
            .map(|_| compiler.allocate(&ValueType::Int).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(
            slots,
            vec![Address::Frame(-16), Address::Frame(-8), Address::Frame(-24)]
        );

        compiler.widen_frame().unwrap();
        assert_eq!(compiler.code[0].to_string(), "    sub rsp, 32");
        assert_eq!(compiler.symbols.lookup_func("f").unwrap().frame_size, 32);
    }

    #[test]
    fn test_call_pads_odd_stack() {
        let text = "package main\nfunc one(a int) int {\n return a\n}\nfunc main() {\n x := 1 + one(2)\n}\n";
        let lines = assemble(text);
        assert!(contains_seq(
            &lines,
            &[
                "    push rax",
                "    sub rsp, 24",
                "    mov rax, 2",
                "    mov QWORD PTR [rsp], rax",
                "    call golite_fn_one",
                "    add rsp, 24",
            ]
        ));
    }

    #[test]
    fn test_struct_argument_is_copied() {
        let text = format!(
            "package main\n{}func norm(p Point) int {{\n return p.x + p.y\n}}\nfunc main() {{\n p := Point{{1, 2}}\n n := norm(p)\n}}\n",
            POINT
        );
        let lines = assemble(&text);
        assert!(contains_seq(
            &lines,
            &[
                "    sub rsp, 16",
                "    mov rax, QWORD PTR [rbp-32]",
                "    mov QWORD PTR [rsp], rax",
                "    mov rax, QWORD PTR [rbp-24]",
                "    mov QWORD PTR [rsp+8], rax",
                "    call golite_fn_norm",
            ]
        ));
        assert!(lines.contains(&"    mov rax, QWORD PTR [rbp+24]".to_string()));
    }

    #[test]
    fn test_globals() {
        let text = "package main\nimport \"fmt\"\nvar total int\nvar greeting = \"hi\"\nfunc main() {\n for i := 0; i < 5; i++ {\n  total += i\n }\n fmt.Println(total, greeting)\n}\n";
        let lines = assemble(text);
        assert!(lines.contains(&".section .data".to_string()));
        assert!(lines.contains(&"golite_global_total: .zero 8".to_string()));
        assert!(lines.contains(&"golite_global_greeting: .zero 8".to_string()));

        let main = position(&lines, "main:");
        assert!(contains_seq(
            &lines[main..],
            &[
                "    mov rax, 0",
                "    mov QWORD PTR [rip + golite_global_total], rax",
                "    lea rax, [rip + .Lstr_0]",
                "    mov QWORD PTR [rip + golite_global_greeting], rax",
            ]
        ));
        assert!(contains_seq(
            &lines,
            &[
                "    push rax",
                "    mov rax, QWORD PTR [rip + golite_global_total]",
                "    pop rcx",
                "    add rax, rcx",
                "    mov QWORD PTR [rip + golite_global_total], rax",
            ]
        ));
    }

    #[test]
    fn test_loops_and_branches() {
        let lines = assemble(&program(
            "x := 0\nfor x < 3 {\n x++\n}\nif x == 3 {\n x--\n} else {\n x = 0\n}",
        ));
        let cond = position(&lines, ".Lfor_cond_");
        let exit = lines[cond + 1..]
            .iter()
            .find(|l| l.starts_with("    je .Lfor_end_"))
            .unwrap();
        let end = exit.trim_start_matches("    je ").to_string() + ":";
        let end_at = position(&lines, &end);
        assert_eq!(
            lines[end_at - 1],
            format!("    jmp {}", lines[cond].trim_end_matches(':'))
        );
        assert!(lines.contains(&"    add QWORD PTR [rbp-16], 1".to_string()));
        assert!(lines.contains(&"    sub QWORD PTR [rbp-16], 1".to_string()));
        assert!(lines.iter().any(|l| l.starts_with("    je .Lif_false_")));
    }

    #[test]
    fn test_short_var_decl_reads_outer_binding() {
        let lines = assemble(&program("x := 1\n{\n x := x + 1\n}"));
        assert!(contains_seq(
            &lines,
            &[
                "    mov rax, QWORD PTR [rbp-16]",
                "    push rax",
                "    mov rax, 1",
                "    mov rcx, rax",
                "    pop rax",
                "    add rax, rcx",
                "    mov QWORD PTR [rbp-8], rax",
            ]
        ));
    }

    #[test]
    fn test_compilations_are_independent() {
        let text = program("s := \"a\" + \"b\"\nif s == \"ab\" {\n fmt.Println(s)\n}");
        assert_eq!(assemble(&text), assemble(&text));
        assert_eq!(
            compile(&program("x := 1")).unwrap().used_helpers(),
            RuntimeHelpers::default()
        );
    }

    #[test]
    fn test_errors() {
        use CompilerError::*;
        let s = String::new;
        for (body, expected) in vec![
            ("x = 1", UndeclaredVariable(s())),
            ("fmt.Println(y)", UndeclaredVariable(s())),
            ("foo()", UndeclaredFunction(s())),
            ("var p Q", UndefinedStructType(s())),
            ("s := \"a\" - \"b\"", UnsupportedOperation(s())),
            ("s := \"a\" < \"b\"", UnsupportedOperation(s())),
            ("b := true + false", UnsupportedOperation(s())),
            ("x := 1\nx[0] = 2", UnsupportedOperation(s())),
            ("x := 1\ny := x[0]", UnsupportedOperation(s())),
            ("s := \"a\"\ns -= \"b\"", UnsupportedOperation(s())),
            ("fmt.Println(fmt.Println())", UnsupportedOperation(s())),
            ("x := fmt.Println()", UnsupportedOperation(s())),
            ("1 = 2", InvalidLvalue(s())),
            ("x := 1\n(x + 1)++", InvalidLvalue(s())),
            ("a, b := 1", ArityOrShapeMismatch(s())),
            ("var a, b int = 1", ArityOrShapeMismatch(s())),
            (
                "x := 1 + \"a\"",
                TypeMismatch {
                    expected: crate::compiler::memory::ValueType::Int,
                    found: crate::compiler::memory::ValueType::Int,
                    context: s(),
                },
            ),
            (
                "if 1 {\n}",
                TypeMismatch {
                    expected: crate::compiler::memory::ValueType::Int,
                    found: crate::compiler::memory::ValueType::Int,
                    context: s(),
                },
            ),
            (
                "s := \"a\"\ns++",
                TypeMismatch {
                    expected: crate::compiler::memory::ValueType::Int,
                    found: crate::compiler::memory::ValueType::Int,
                    context: s(),
                },
            ),
            (
                "return 1",
                TypeMismatch {
                    expected: crate::compiler::memory::ValueType::Int,
                    found: crate::compiler::memory::ValueType::Int,
                    context: s(),
                },
            ),
            (
                "x := 1\nx.y = 2",
                UndefinedField {
                    struct_name: s(),
                    field: s(),
                },
            ),
        ] {
            let err = compile(&program(body)).unwrap_err();
            assert!(
                matches!(&err, InFunction { name, .. } if name == "main"),
                "{}: {:?}",
                body,
                err
            );
            assert_eq!(
                discriminant(err.root()),
                discriminant(&expected),
                "{}: {:?}",
                body,
                err
            );
        }
    }

    #[test]
    fn test_program_errors() {
        use CompilerError::*;
        for (text, expected) in vec![
            (
                "package main\nfunc helper() {\n}\n",
                UndeclaredFunction("main".into()),
            ),
            (
                "package main\nfunc f() {\n}\nfunc f() {\n}\nfunc main() {\n}\n",
                DuplicateFunctionDefinition("f".into()),
            ),
            (
                "package main\ntype A struct {\n x int\n}\ntype A struct {\n y int\n}\nfunc main() {\n}\n",
                DuplicateStructDefinition("A".into()),
            ),
            (
                "package main\nfunc main(x int) {\n}\n",
                ArityOrShapeMismatch(
                    "`main` must take no parameters and return no value".into(),
                ),
            ),
        ] {
            assert_eq!(compile(text).err(), Some(expected), "{}", text);
        }

        for (text, expected) in vec![
            (
                "package main\nfunc f(a int) int {\n return a\n}\nfunc main() {\n x := f(1, 2)\n}\n",
                ArityOrShapeMismatch(String::new()),
            ),
            (
                "package main\nfunc f(a int) int {\n return a\n}\nfunc main() {\n x := f(true)\n}\n",
                TypeMismatch {
                    expected: crate::compiler::memory::ValueType::Int,
                    found: crate::compiler::memory::ValueType::Int,
                    context: String::new(),
                },
            ),
            (
                "package main\nfunc f() int {\n return \"s\"\n}\nfunc main() {\n}\n",
                TypeMismatch {
                    expected: crate::compiler::memory::ValueType::Int,
                    found: crate::compiler::memory::ValueType::Int,
                    context: String::new(),
                },
            ),
            (
                "package main\ntype Line struct {\n a Point\n}\nfunc main() {\n}\n",
                UnsupportedFieldType {
                    struct_name: String::new(),
                    field: String::new(),
                    ty: String::new(),
                },
            ),
            (
                "package main\nvar x = 1\nvar x = 2\nfunc main() {\n}\n",
                UnsupportedOperation(String::new()),
            ),
        ] {
            let err = compile(text).unwrap_err();
            assert_eq!(
                discriminant(err.root()),
                discriminant(&expected),
                "{}: {:?}",
                text,
                err
            );
        }
    }
}
