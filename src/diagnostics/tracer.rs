/// Prints the enclosing function name, current line and current token when the
/// stage's `TracingConfig` covers that line. The traced value must expose
/// `tracing()`, `line()` and `current_token()`.
#[macro_export]
macro_rules! trace {
    ($ts:expr) => {
        if $ts.tracing().includes($ts.line() as usize) {
            eprintln!(
                "{} <- L{}:{:?}",
                stdext::function_name!(),
                $ts.line(),
                $ts.current_token()
            )
        }
    };
}
