extern crate log;
extern crate simplelog;

use std::io::Write;
use std::time::Instant;

use log::info;

use golite::compiler::{lexer::Lexer, parser, Compiler};
use golite::{
    asm_only, configure_cli, configure_logging, get_emit, get_lexer_tracing, get_log_level,
    get_parser_tracing, print_errs, write_output, Emit, Error, ERR_ARGUMENT_ERROR,
    ERR_CODEGEN_ERROR, ERR_INPUT_ERROR, ERR_LEXER_ERROR, ERR_OUTPUT_ERROR, ERR_PARSER_ERROR,
};

fn main() {
    if let Err(code) = run() {
        std::process::exit(code);
    }
}

fn run() -> Result<(), i32> {
    let config = configure_cli().get_matches();

    if let Some(level) = get_log_level(&config) {
        if let Err(e) = configure_logging(level) {
            print_errs(&[format!("Failed to configure logger: {}", e)]);
            return Err(ERR_ARGUMENT_ERROR);
        }
    }

    let quiet = asm_only(&config);
    let emit = get_emit(&config);
    let (lexer_tracing, parser_tracing) =
        match (get_lexer_tracing(&config), get_parser_tracing(&config)) {
            (Ok(l), Ok(p)) => (l, p),
            (Err(msg), _) | (_, Err(msg)) => {
                print_errs(&[msg]);
                return Err(ERR_ARGUMENT_ERROR);
            }
        };

    let input = match config.value_of("input") {
        Some(input) => input,
        None => {
            print_errs(&["Expected an input source file to compile".into()]);
            return Err(ERR_ARGUMENT_ERROR);
        }
    };
    let text = match std::fs::read_to_string(input) {
        Ok(text) => text,
        Err(e) => {
            print_errs(&[format!("Could not open {}: {}", input, e)]);
            return Err(ERR_INPUT_ERROR);
        }
    };
    info!("Compiling {}", input);

    let tokenize_time = Instant::now();
    let mut lexer = Lexer::new(&text);
    lexer.set_tracing(lexer_tracing);
    let tokens = match lexer.tokenize().into_iter().collect::<Result<Vec<_>, _>>() {
        Ok(tokens) => tokens,
        Err(e) => {
            print_errs(&[format!("{}", Error::from(e))]);
            return Err(ERR_LEXER_ERROR);
        }
    };
    if !quiet {
        eprintln!("Lexer: {}", tokenize_time.elapsed().as_secs_f32());
    }

    if emit == Emit::Tokens {
        return write_json(&config, &tokens);
    }

    let parse_time = Instant::now();
    let program = match parser::parse_traced(tokens, parser_tracing) {
        Ok(program) => program,
        Err(e) => {
            print_errs(&[format!("{}", Error::from(e))]);
            return Err(ERR_PARSER_ERROR);
        }
    };
    if !quiet {
        eprintln!("Parser: {}", parse_time.elapsed().as_secs_f32());
    }

    if emit == Emit::Ast {
        return write_json(&config, &program);
    }

    let codegen_time = Instant::now();
    let compiler = match Compiler::compile(&program) {
        Ok(compiler) => compiler,
        Err(e) => {
            print_errs(&[format!("{}", Error::from(e))]);
            return Err(ERR_CODEGEN_ERROR);
        }
    };
    if !quiet {
        eprintln!("Code Generation: {}", codegen_time.elapsed().as_secs_f32());
    }
    info!("Runtime helpers: {:?}", compiler.used_helpers());

    emit_output(&config, |out| compiler.print(out))
}

fn write_json<T: serde::Serialize>(config: &clap::ArgMatches, value: &T) -> Result<(), i32> {
    emit_output(config, |out| {
        serde_json::to_writer_pretty(&mut *out, value)?;
        writeln!(out)
    })
}

/// Writes to the file named by `--output`, or to stdout.
fn emit_output<F>(config: &clap::ArgMatches, write: F) -> Result<(), i32>
where
    F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
{
    write_output(config.value_of("output"), write).map_err(|e| {
        print_errs(&[format!("{}", Error::Output(e.to_string()))]);
        ERR_OUTPUT_ERROR
    })
}
