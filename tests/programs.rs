use golite::{
    compile_source,
    compiler::{Compiler, CompilerError},
    Error,
};

fn lines(asm: &str) -> Vec<&str> {
    asm.lines().collect()
}

/// The body of the function labelled `name`, up to its `ret`.
fn function<'a>(asm: &'a [&'a str], name: &str) -> &'a [&'a str] {
    let label = format!("{}:", name);
    let start = asm.iter().position(|l| *l == label).unwrap();
    let len = asm[start..].iter().position(|l| *l == "    ret").unwrap();
    &asm[start..=start + len]
}

fn contains_seq(lines: &[&str], seq: &[&str]) -> bool {
    lines.windows(seq.len()).any(|w| w == seq)
}

#[test]
fn loop_total() {
    let text = r#"
package main

import "fmt"

var total int

func main() {
    for i := 0; i < 5; i++ {
        total += i
    }
    fmt.Println(total)
}
"#;
    let asm = compile_source(text).unwrap();
    let asm = lines(&asm);
    assert!(asm.contains(&"golite_global_total: .zero 8"));

    let main = function(&asm, "main");
    assert_eq!(main[1..4], ["    push rbp", "    mov rbp, rsp", "    sub rsp, 16"]);
    assert!(main.iter().any(|l| l.starts_with(".Lfor_cond_")));
    assert!(main.contains(&"    add QWORD PTR [rbp-16], 1"));
    assert!(contains_seq(
        main,
        &[
            "    mov rax, QWORD PTR [rip + golite_global_total]",
            "    mov rsi, rax",
            "    lea rdi, [rip + .Lfmt_int_nl]",
            "    mov rax, 0",
            "    call printf",
        ]
    ));
    assert!(!asm.iter().any(|l| l.contains("golite_concat") || l.contains("golite_streq")));
}

#[test]
fn struct_field() {
    let text = r#"
package main

import "fmt"

func main() {
    p := Point{3, 4}
    fmt.Println(p.y)
}

type Point struct {
    x, y int
}
"#;
    let asm = compile_source(text).unwrap();
    let asm = lines(&asm);
    let main = function(&asm, "main");
    assert!(contains_seq(
        main,
        &[
            "    pop rax",
            "    mov QWORD PTR [rbp-8], rax",
            "    pop rax",
            "    mov QWORD PTR [rbp-16], rax",
            "    mov rax, QWORD PTR [rbp-8]",
        ]
    ));
}

#[test]
fn undeclared_variable() {
    let text = r#"
package main

import "fmt"

func main() {
    x := 1
    fmt.Println(x + y)
}
"#;
    match compile_source(text) {
        Err(Error::Compiler(e)) => {
            assert_eq!(e.root(), &CompilerError::UndeclaredVariable("y".into()));
            assert_eq!(
                format!("{}", e),
                "in function `main`: undeclared variable `y`"
            );
        }
        other => panic!("expected an undeclared variable, got {:?}", other),
    }
}

#[test]
fn function_call() {
    let text = r#"
package main

import "fmt"

func add(a int, b int) int {
    return a + b
}

func main() {
    fmt.Println(add(2, 3))
}
"#;
    let asm = compile_source(text).unwrap();
    let asm = lines(&asm);
    assert!(asm.contains(&".globl golite_fn_add"));
    assert!(asm.contains(&".globl main"));

    let main = function(&asm, "main");
    assert!(contains_seq(
        main,
        &[
            "    sub rsp, 16",
            "    mov rax, 2",
            "    mov QWORD PTR [rsp], rax",
            "    mov rax, 3",
            "    mov QWORD PTR [rsp+8], rax",
            "    call golite_fn_add",
            "    add rsp, 16",
            "    mov rsi, rax",
        ]
    ));

    let add = function(&asm, "golite_fn_add");
    assert!(add.contains(&"    mov rax, QWORD PTR [rbp+16]"));
    assert!(add.contains(&"    mov rax, QWORD PTR [rbp+24]"));
}

#[test]
fn strings() {
    let text = r#"
package main

import "fmt"

func greet(name string) string {
    return "hello, " + name
}

func main() {
    s := greet("world")
    if s != "hello, world" {
        fmt.Println("broken")
    }
    s += "!"
    fmt.Println(s, len, true)
}
"#;
    // `len` is not a builtin here
    assert!(matches!(
        compile_source(text),
        Err(Error::Compiler(ref e)) if *e.root() == CompilerError::UndeclaredVariable("len".into())
    ));

    let asm = compile_source(&text.replace(", len,", ",")).unwrap();
    let asm = lines(&asm);
    assert_eq!(asm.iter().filter(|l| **l == "golite_concat:").count(), 1);
    assert_eq!(asm.iter().filter(|l| **l == "golite_streq:").count(), 1);
    assert!(asm.contains(&".Lstr_0: .string \"hello, \""));
    assert!(asm.contains(&".Lstr_1: .string \"world\""));
    assert!(asm.contains(&".Lstr_2: .string \"hello, world\""));
    assert!(asm.contains(&"    xor rax, 1"));
    assert_eq!(asm.last(), Some(&".section .note.GNU-stack,\"\",@progbits"));
}

#[test]
fn every_frame_is_aligned() {
    let text = r#"
package main

import "fmt"

type Rect struct {
    w, h int
    label string
}

func area(r Rect) int {
    a := r.w * r.h
    return a
}

func classify(n int) string {
    if n > 100 {
        big := "big"
        return big
    } else if n > 10 {
        return "medium"
    }
    return "small"
}

func main() {
    var r Rect
    r.w = 12
    r.h = 10
    r.label = "box"
    for i := 0; i < 3; i++ {
        j := i * 2
        fmt.Println(j, classify(area(r) + j))
    }
}
"#;
    let asm = compile_source(text).unwrap();
    let asm = lines(&asm);
    for name in vec!["golite_fn_area", "golite_fn_classify", "main"] {
        let body = function(&asm, name);
        let reserve = body[3].trim_start_matches("    sub rsp, ");
        let reserve = reserve.parse::<i64>().unwrap();
        assert_eq!(reserve % 16, 0, "{}", name);
    }
    assert_eq!(function(&asm, "main")[3], "    sub rsp, 48");
}

#[test]
fn errors_produce_no_assembly() {
    for (text, expected) in vec![
        (
            "package main\nfunc main() {\n x := 1 +\n}\n",
            "Parser",
        ),
        ("package main\nfunc main() {\n x := \"open\n}\n", "Lexer"),
        ("package main\nfunc main() {\n x := y\n}\n", "Compiler"),
    ] {
        let err = compile_source(text).unwrap_err();
        assert!(format!("{}", err).starts_with(expected), "{}: {}", text, err);
    }
}

#[test]
fn independent_compilations() {
    let text = "package main\nimport \"fmt\"\nfunc main() {\n fmt.Println(\"a\" + \"b\")\n}\n";
    let first = compile_source(text).unwrap();
    let second = compile_source(text).unwrap();
    assert_eq!(first, second);

    let tokens = golite::compiler::lexer::Lexer::new(text)
        .tokenize()
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    let program = golite::compiler::parser::parse(tokens).unwrap();
    let compiler = Compiler::compile(&program).unwrap();
    assert!(compiler.used_helpers().concat);
    assert!(!compiler.used_helpers().streq);
}
