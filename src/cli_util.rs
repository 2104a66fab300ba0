use std::io::{self, IsTerminal, Write};

use nu_ansi_term::Color;

use crate::{CompileError, ExecError, InterpreterError};

/// Render `msg` as an error header, in red when stderr is a terminal.
fn header(program: Option<&str>, msg: &str) -> String {
    let text = match program {
        Some(p) => format!("{p}: {msg}"),
        None => msg.to_string(),
    };
    if io::stderr().is_terminal() {
        Color::Red.bold().paint(text).to_string()
    } else {
        text
    }
}

/// Print a one-line error (load, config, or I/O failure) to stderr.
pub fn print_error(program: Option<&str>, msg: &str) {
    eprintln!("{}", header(program, msg));
    let _ = io::stderr().flush();
}

/// Pretty-print an [`InterpreterError`]; compile errors get caret context.
/// If `program` is `Some("bf")`, messages are prefixed with "bf: ...".
pub fn print_interpreter_error(program: Option<&str>, code: &str, err: &InterpreterError) {
    match err {
        InterpreterError::Compile(CompileError::UnmatchedBracket { ip, kind }) => {
            let msg = header(program, &format!("Parse error: unmatched bracket {kind}"));
            print_error_with_context(&msg, code, *ip);
        }
        InterpreterError::Exec(ExecError::PointerUnderflow { ptr, delta }) => {
            print_error(
                program,
                &format!("Runtime error: pointer out of bounds (ptr={ptr}, move={delta})"),
            );
        }
        InterpreterError::Exec(ExecError::InputExhausted) => {
            print_error(program, "Runtime error: input exhausted");
        }
        InterpreterError::Exec(ExecError::Io(source)) => {
            print_error(program, &format!("I/O error: {source}"));
        }
    }
}

/// Print a concise error with instruction index and a caret context window.
/// `code` is the cleaned instruction stream, so every char is one byte.
pub fn print_error_with_context(prefix: &str, code: &str, pos: usize) {
    eprintln!("{prefix} at instruction {pos}");

    // Show a short window around the position for context
    const WINDOW_CHARS: usize = 32;

    let (start, slice) = context_window(code, pos, WINDOW_CHARS);
    eprintln!("  {slice}");

    // Caret under the exact position
    let caret_offset = pos.saturating_sub(start);
    eprintln!("  {:caret_offset$}^", "");
    let _ = io::stderr().flush();
}

/// Up to `window` chars either side of `pos`, plus the char index the
/// slice starts at.
fn context_window(code: &str, pos: usize, window: usize) -> (usize, String) {
    let start = pos.saturating_sub(window);
    let slice = code.chars().skip(start).take(pos - start + window + 1).collect();
    (start, slice)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_clamped_at_start() {
        let (start, slice) = context_window("+++]", 3, 32);
        assert_eq!(start, 0);
        assert_eq!(slice, "+++]");
    }

    #[test]
    fn window_is_centred_on_position() {
        let code = format!("{}]{}", "+".repeat(10), "-".repeat(10));
        let (start, slice) = context_window(&code, 10, 3);
        assert_eq!(start, 7);
        assert_eq!(slice, "+++]---");
    }
}
