//! A run-length folding Brainfuck interpreter library.
//!
//! Programs go through two strictly sequential stages:
//!
//! 1. [`compile`] scans the cleaned instruction stream once and builds a
//!    tree of [`Node`]s. Runs of the same operation kind fold into a single
//!    node with a net signed count (`+-+` is `add 1`), and every loop owns
//!    its fully compiled body.
//! 2. [`Executor`] walks that tree against a [`Tape`] of fixed-width cells.
//!
//! Features and behaviors:
//! - Cells are 4, 8, 16 or 32 bits wide; arithmetic wraps modulo `2^W`.
//! - The tape starts at a configured length (30,000 cells by default) and
//!   grows to the right by 50% whenever the pointer moves past its end.
//! - Moving left of cell 0 is a runtime error.
//! - `,` reads a single byte; end of input follows an [`EofPolicy`].
//! - `.` writes the low byte of the current cell.
//! - Unmatched brackets are reported at compile time, before anything runs.
//!
//! Quick start:
//!
//! ```no_run
//! use bf_fold::{Config, Interpreter};
//!
//! // Classic "Hello World!" in Brainfuck
//! let code = "++++++++++[>+++++++>++++++++++>+++>+<<<<-]>++.>+.+++++++..+++.>++.<<+++++++++++++++.>.+++.------.--------.>+.>.";
//! let bf = Interpreter::new(code, &Config::default());
//! bf.run(std::io::stdin(), std::io::stdout()).expect("program should run");
//! ```

use std::io::{Read, Write};
use std::time::Instant;

pub mod cli_util;
pub mod compiler;
pub mod config;
pub mod executor;
pub mod ir;
pub mod source;
pub mod tape;
pub mod timing;

pub use compiler::{compile, CompileError, UnmatchedBracketKind};
pub use config::{Config, ConfigError, Overrides};
pub use executor::{EofPolicy, ExecError, Executor};
pub use ir::{Node, OpKind, Program};
pub use source::{load_program, SourceError};
pub use tape::{CellWidth, Tape};
pub use timing::{TimeUnit, Timings};

/// Any failure of a compile-then-execute run.
#[derive(Debug, thiserror::Error)]
pub enum InterpreterError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Exec(#[from] ExecError),
}

/// One interpreter run: cleaned source plus a fresh zeroed tape.
pub struct Interpreter {
    code: String,
    tape: Tape,
    eof: EofPolicy,
}

impl Interpreter {
    /// Create an interpreter for `code`, which should already be reduced to
    /// the eight instruction symbols (see [`source::bf_only`]).
    pub fn new(code: impl Into<String>, config: &Config) -> Self {
        Self {
            code: code.into(),
            tape: Tape::new(config.memory_size, config.cell_width),
            eof: config.eof,
        }
    }

    /// Compile without executing.
    pub fn compile(&self) -> Result<Program, CompileError> {
        compile(&self.code)
    }

    /// Compile fully, then execute fully, reading `,` from `input` and
    /// writing `.` to `output`. Returns how long each phase took.
    pub fn run<R: Read, W: Write>(self, input: R, output: W) -> Result<Timings, InterpreterError> {
        let start = Instant::now();
        let program = compile(&self.code)?;
        let compiled = Instant::now();

        let mut executor = Executor::new(self.tape, input, output).with_eof_policy(self.eof);
        executor.run(&program)?;
        let finished = Instant::now();

        Ok(Timings {
            compile: compiled - start,
            execute: finished - compiled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::empty;

    #[test]
    fn runs_program_to_completion() {
        let mut out = Vec::new();
        let code = format!("{}.", "+".repeat(65));
        Interpreter::new(code, &Config::default())
            .run(empty(), &mut out)
            .unwrap();
        assert_eq!(out, b"A");
    }

    #[test]
    fn compile_errors_abort_before_execution() {
        let mut out = Vec::new();
        let result = Interpreter::new("+.]", &Config::default()).run(empty(), &mut out);
        assert!(matches!(
            result,
            Err(InterpreterError::Compile(CompileError::UnmatchedBracket {
                ip: 2,
                kind: UnmatchedBracketKind::Close
            }))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn runtime_errors_surface_through_facade() {
        let result = Interpreter::new(",", &Config::default()).run(empty(), Vec::new());
        assert!(matches!(result, Err(InterpreterError::Exec(ExecError::InputExhausted))));
    }

    #[test]
    fn config_selects_width_and_eof_policy() {
        let config = Config {
            cell_width: CellWidth::Four,
            eof: EofPolicy::Zero,
            ..Config::default()
        };
        let mut out = Vec::new();
        // 17 wraps to 1 in a 4-bit cell; ',' at EOF clears it, loop is skipped
        let code = format!("{}.,[.]", "+".repeat(17));
        Interpreter::new(code, &config).run(empty(), &mut out).unwrap();
        assert_eq!(out, [1u8]);
    }
}
