//! Tree-walking executor for compiled programs.

use std::fmt;
use std::io::{self, Read, Write};
use std::str::FromStr;

use tracing::debug;

use crate::ir::{Node, OpKind, Program};
use crate::tape::Tape;

/// Errors that can occur while executing a compiled program.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// A move would take the data pointer left of cell 0.
    #[error("Pointer out of bounds: moving {delta} from cell {ptr} goes below cell 0")]
    PointerUnderflow { ptr: usize, delta: i64 },

    /// `,` found no more input and the EOF policy is [`EofPolicy::Error`].
    #[error("Input exhausted: no more bytes to read")]
    InputExhausted,

    /// An underlying I/O error on the input source or output sink.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// What `,` does once the input source is exhausted. Applied to every
/// read of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum EofPolicy {
    /// Abort execution with [`ExecError::InputExhausted`].
    #[default]
    Error,
    /// Store 0 in the current cell.
    Zero,
    /// Leave the current cell as it is.
    Unchanged,
}

impl fmt::Display for EofPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EofPolicy::Error => write!(f, "error"),
            EofPolicy::Zero => write!(f, "zero"),
            EofPolicy::Unchanged => write!(f, "unchanged"),
        }
    }
}

impl FromStr for EofPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(EofPolicy::Error),
            "zero" => Ok(EofPolicy::Zero),
            "unchanged" => Ok(EofPolicy::Unchanged),
            other => Err(format!("eof policy must be one of error, zero, unchanged (got '{other}')")),
        }
    }
}

/// Owns the tape and the data pointer for one run, plus the byte source
/// read by `,` and the sink written by `.`.
pub struct Executor<R, W> {
    tape: Tape,
    pointer: usize,
    input: R,
    output: W,
    eof: EofPolicy,
}

impl<R: Read, W: Write> Executor<R, W> {
    pub fn new(tape: Tape, input: R, output: W) -> Self {
        Self {
            tape,
            pointer: 0,
            input,
            output,
            eof: EofPolicy::default(),
        }
    }

    pub fn with_eof_policy(mut self, eof: EofPolicy) -> Self {
        self.eof = eof;
        self
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Give back the sink, e.g. to inspect captured output.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Execute `program` to completion and flush the output sink.
    ///
    /// On error the tape keeps whatever state it had reached.
    pub fn run(&mut self, program: &Program) -> Result<(), ExecError> {
        let result = self.execute(program.nodes());
        let flushed = self.output.flush();
        debug!(
            pointer = self.pointer,
            tape_len = self.tape.len(),
            cell_bits = self.tape.width().bits(),
            ok = result.is_ok(),
            "execution finished"
        );
        // A failed run reports its own error, not a later flush failure.
        result?;
        flushed?;
        Ok(())
    }

    /// Execute a sequence of nodes, recursing into loop bodies.
    pub fn execute(&mut self, nodes: &[Node]) -> Result<(), ExecError> {
        for node in nodes {
            match node {
                Node::Op { kind: OpKind::MovePointer, count } => self.move_pointer(*count)?,
                Node::Op { kind: OpKind::ModifyCell, count } => self.tape.add(self.pointer, *count),
                Node::Op { kind: OpKind::Output, count } => self.write_cell(*count)?,
                Node::Op { kind: OpKind::Input, .. } => self.read_cell()?,
                Node::Loop(body) => {
                    while self.tape.get(self.pointer) != 0 {
                        self.execute(body)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn move_pointer(&mut self, delta: i64) -> Result<(), ExecError> {
        let target = i64::try_from(self.pointer)
            .ok()
            .and_then(|p| p.checked_add(delta))
            .and_then(|t| usize::try_from(t).ok());
        let Some(target) = target else {
            return Err(ExecError::PointerUnderflow { ptr: self.pointer, delta });
        };
        self.tape.ensure_capacity(target);
        self.pointer = target;
        Ok(())
    }

    /// Emit the low byte of the current cell `count` times, then flush so
    /// output stays ordered with respect to any following read.
    ///
    /// Cells wider than 8 bits are truncated: a 16-bit cell holding 0x141
    /// writes `A`, not the code point U+0141.
    fn write_cell(&mut self, count: i64) -> Result<(), ExecError> {
        let byte = (self.tape.get(self.pointer) & 0xFF) as u8;
        for _ in 0..count.max(0) {
            self.output.write_all(&[byte])?;
        }
        self.output.flush()?;
        Ok(())
    }

    /// Read one byte into the current cell. A folded run of `,` still reads
    /// a single byte.
    fn read_cell(&mut self) -> Result<(), ExecError> {
        let mut buf = [0u8; 1];
        let read = loop {
            match self.input.read(&mut buf) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ExecError::Io(e)),
            }
        };

        if read == 0 {
            return match self.eof {
                EofPolicy::Error => Err(ExecError::InputExhausted),
                EofPolicy::Zero => {
                    self.tape.set(self.pointer, 0);
                    Ok(())
                }
                EofPolicy::Unchanged => Ok(()),
            };
        }

        self.tape.set(self.pointer, buf[0] as u64);
        Ok(())
    }
}
