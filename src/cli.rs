use std::io::Write;

use clap::{App, Arg, ArgMatches};
use log::LevelFilter;
use simplelog::{Config, WriteLogger};

use crate::diagnostics::TracingConfig;

// Exit Codes for different types of errors
pub const ERR_INPUT_ERROR: i32 = 1;
pub const ERR_LEXER_ERROR: i32 = 2;
pub const ERR_PARSER_ERROR: i32 = 3;
pub const ERR_CODEGEN_ERROR: i32 = 4;
pub const ERR_OUTPUT_ERROR: i32 = 5;
pub const ERR_ARGUMENT_ERROR: i32 = 6;

/// What the driver writes to its output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Emit {
    Asm,
    Ast,
    Tokens,
}

pub fn print_errs(errs: &[String]) {
    for e in errs {
        eprintln!("{}", e);
    }
}

pub fn configure_cli() -> clap::App<'static, 'static> {
    let app = App::new("GoLite Compiler")
        .version("0.1.0")
        .about("Compiles a subset of Go into x86-64 assembly for the GNU assembler")
        .arg(
            Arg::with_name("input")
                .takes_value(true)
                .required(true)
                .help("Source code file to compile"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .required(false)
                .help("Name the output file that the assembly will be written to. Defaults to stdout."),
        )
        .arg(
            Arg::with_name("asm-only")
                .short("s")
                .long("asm-only")
                .help("Only write the assembly: no stage timings and no logging")
        )
        .arg(
            Arg::with_name("emit")
                .long("emit")
                .possible_values(&["asm", "ast", "tokens"])
                .default_value("asm")
                .takes_value(true)
                .help("Write the assembly (default), the syntax tree as JSON, or the tokens as JSON")
        )
        .arg(
            Arg::with_name("log-level")
                .long("log-level")
                .possible_values(&["off", "error", "warn", "info", "debug", "trace"])
                .takes_value(true)
                .help("Writes the compiler's log to stderr at the given level")
        )
        .arg(
            Arg::with_name("trace-lexer")
                .long("trace-lexer")
                .takes_value(true)
                .help("Prints out a trace of all the steps the lexer follows as it converts the source text into tokens.
                Takes `all`, a line `N`, or a range `..N`, `N..` or `N..M`.")
        )
        .arg(
            Arg::with_name("trace-parser")
                .long("trace-parser")
                .takes_value(true)
                .help("Prints out a trace of all the steps the parser follows as it converts the token vector into an AST.  The current token is printed next to the step.
                Takes `all`, a line `N`, or a range `..N`, `N..` or `N..M`.")
        );
    app
}

pub fn get_log_level(args: &ArgMatches) -> Option<LevelFilter> {
    if args.is_present("asm-only") {
        return None;
    }
    match args.value_of("log-level") {
        Some("error") => Some(LevelFilter::Error),
        Some("warn") => Some(LevelFilter::Warn),
        Some("info") => Some(LevelFilter::Info),
        Some("debug") => Some(LevelFilter::Debug),
        Some("trace") => Some(LevelFilter::Trace),
        _ => None,
    }
}

pub fn configure_logging(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    WriteLogger::init(level, Config::default(), std::io::stderr())
}

pub fn get_emit(args: &ArgMatches) -> Emit {
    match args.value_of("emit") {
        Some("ast") => Emit::Ast,
        Some("tokens") => Emit::Tokens,
        _ => Emit::Asm,
    }
}

pub fn asm_only(args: &ArgMatches) -> bool {
    args.is_present("asm-only")
}

pub fn get_lexer_tracing(args: &ArgMatches) -> Result<TracingConfig, String> {
    get_tracing(args, "trace-lexer")
}

pub fn get_parser_tracing(args: &ArgMatches) -> Result<TracingConfig, String> {
    get_tracing(args, "trace-parser")
}

fn get_tracing(args: &ArgMatches, name: &str) -> Result<TracingConfig, String> {
    match args.value_of(name) {
        None => Ok(TracingConfig::Off),
        Some(range) => range.parse(),
    }
}

/// Writes to the file at `path`, or to stdout. `write` renders into memory
/// first: if it fails, nothing is written and no file is created.
pub fn write_output<F>(path: Option<&str>, write: F) -> std::io::Result<()>
where
    F: FnOnce(&mut dyn Write) -> std::io::Result<()>,
{
    let mut buf = vec![];
    write(&mut buf)?;
    match path {
        Some(path) => std::fs::write(path, &buf),
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(&buf)?;
            lock.flush()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("golitec_{}_{}.s", name, std::process::id()));
        let _ = std::fs::remove_file(&path);
        path
    }

    fn matches(args: &[&str]) -> ArgMatches<'static> {
        configure_cli().get_matches_from(args)
    }

    #[test]
    fn test_defaults() {
        let args = matches(&["golitec", "main.go"]);
        assert_eq!(args.value_of("input"), Some("main.go"));
        assert_eq!(args.value_of("output"), None);
        assert_eq!(get_emit(&args), Emit::Asm);
        assert_eq!(get_log_level(&args), None);
        assert!(!asm_only(&args));
        assert_eq!(get_lexer_tracing(&args), Ok(TracingConfig::Off));
    }

    #[test]
    fn test_options() {
        let args = matches(&[
            "golitec",
            "main.go",
            "-o",
            "main.s",
            "--emit",
            "ast",
            "--log-level",
            "debug",
            "--trace-parser",
            "3..9",
        ]);
        assert_eq!(args.value_of("output"), Some("main.s"));
        assert_eq!(get_emit(&args), Emit::Ast);
        assert_eq!(get_log_level(&args), Some(LevelFilter::Debug));
        assert_eq!(get_parser_tracing(&args), Ok(TracingConfig::Between(3, 9)));
    }

    #[test]
    fn test_asm_only_silences_logging() {
        let args = matches(&["golitec", "-s", "main.go", "--log-level", "trace"]);
        assert!(asm_only(&args));
        assert_eq!(get_log_level(&args), None);
    }

    #[test]
    fn test_bad_trace_range() {
        let args = matches(&["golitec", "main.go", "--trace-lexer", "x..y"]);
        assert!(get_lexer_tracing(&args).is_err());
    }

    #[test]
    fn test_failed_write_creates_no_file() {
        let path = scratch("failed");
        let result = write_output(path.to_str(), |out| {
            out.write_all(b".intel_syntax noprefix\n")?;
            Err(std::io::Error::new(std::io::ErrorKind::Other, "interrupted"))
        });
        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_write_output_to_file() {
        let path = scratch("written");
        write_output(path.to_str(), |out| out.write_all(b"main:\n    ret\n")).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "main:\n    ret\n");
        std::fs::remove_file(&path).unwrap();
    }
}
