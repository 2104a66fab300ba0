//! Single-pass compiler from cleaned Brainfuck source to the nested IR.
//!
//! Consecutive symbols of the same operation kind fold into one
//! [`Node::Op`] carrying their signed sum, so `+-+` becomes `add 1` and
//! `>><` becomes `move 1`. Brackets are tracked with an explicit stack of
//! open loop bodies; a body is attached to its parent only once its `]`
//! has been seen.

use std::fmt;

use tracing::debug;

use crate::ir::{Node, OpKind, Program};

/// Errors that can occur while compiling Brainfuck code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// Loops were not balanced; a matching `[` or `]` was not found.
    #[error("Unmatched bracket {kind} at instruction {ip}")]
    UnmatchedBracket { ip: usize, kind: UnmatchedBracketKind },
}

/// Which side of the loop was unmatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnmatchedBracketKind {
    Open,
    Close,
}

impl fmt::Display for UnmatchedBracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnmatchedBracketKind::Open => write!(f, "'['"),
            UnmatchedBracketKind::Close => write!(f, "']'"),
        }
    }
}

/// An open loop: where its `[` was and the body built so far.
struct OpenLoop {
    ip: usize,
    body: Vec<Node>,
}

/// Compile `source` into a [`Program`].
///
/// `source` is expected to hold only the eight instruction symbols; any
/// other character is skipped. Positions in errors are indices into
/// `source` counted in characters.
pub fn compile(source: &str) -> Result<Program, CompileError> {
    let chars: Vec<char> = source.chars().collect();
    let mut top_level: Vec<Node> = Vec::new();
    let mut stack: Vec<OpenLoop> = Vec::new();

    let mut ip = 0;
    while ip < chars.len() {
        match chars[ip] {
            '[' => stack.push(OpenLoop { ip, body: Vec::new() }),
            ']' => {
                let Some(closed) = stack.pop() else {
                    return Err(CompileError::UnmatchedBracket {
                        ip,
                        kind: UnmatchedBracketKind::Close,
                    });
                };
                let node = Node::Loop(closed.body);
                match stack.last_mut() {
                    Some(parent) => parent.body.push(node),
                    None => top_level.push(node),
                }
            }
            c => {
                let Some((kind, mut count)) = OpKind::from_symbol(c) else {
                    ip += 1;
                    continue;
                };
                // Fold the run of same-kind symbols that follows.
                while let Some(&next) = chars.get(ip + 1) {
                    match OpKind::from_symbol(next) {
                        Some((next_kind, step)) if next_kind == kind => {
                            count += step;
                            ip += 1;
                        }
                        _ => break,
                    }
                }
                let node = Node::op(kind, count);
                match stack.last_mut() {
                    Some(open) => open.body.push(node),
                    None => top_level.push(node),
                }
            }
        }
        ip += 1;
    }

    if let Some(unclosed) = stack.last() {
        return Err(CompileError::UnmatchedBracket {
            ip: unclosed.ip,
            kind: UnmatchedBracketKind::Open,
        });
    }

    let program = Program::new(top_level);
    debug!(
        symbols = chars.len(),
        nodes = program.node_count(),
        loops = program.loop_count(),
        "compiled program"
    );
    Ok(program)
}
