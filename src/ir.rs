//! Intermediate representation produced by the compiler.
//!
//! A compiled program is a tree: a sequence of [`Node`]s where each node is
//! either a counted operation (a run of same-kind symbols folded into one
//! signed count) or a loop holding its own fully built body.

use std::fmt;

/// The four counted operation kinds. Brackets never become counted
/// operations; they produce [`Node::Loop`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    /// `>` and `<`
    MovePointer,
    /// `+` and `-`
    ModifyCell,
    /// `.`
    Output,
    /// `,`
    Input,
}

impl OpKind {
    /// Map an instruction symbol to its kind and the signed step it
    /// contributes to a run. Returns `None` for brackets and non-instructions.
    pub fn from_symbol(symbol: char) -> Option<(OpKind, i64)> {
        match symbol {
            '>' => Some((OpKind::MovePointer, 1)),
            '<' => Some((OpKind::MovePointer, -1)),
            '+' => Some((OpKind::ModifyCell, 1)),
            '-' => Some((OpKind::ModifyCell, -1)),
            '.' => Some((OpKind::Output, 1)),
            ',' => Some((OpKind::Input, 1)),
            _ => None,
        }
    }

    fn mnemonic(self) -> &'static str {
        match self {
            OpKind::MovePointer => "move",
            OpKind::ModifyCell => "add",
            OpKind::Output => "out",
            OpKind::Input => "in",
        }
    }
}

/// True for the eight Brainfuck instruction characters `><+-.,[]`.
pub fn is_instruction(c: char) -> bool {
    matches!(c, '>' | '<' | '+' | '-' | '.' | ',' | '[' | ']')
}

/// One node of the compiled tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A folded run of one operation kind with its net signed count.
    Op { kind: OpKind, count: i64 },
    /// A loop body, executed while the current cell is nonzero.
    Loop(Vec<Node>),
}

impl Node {
    pub fn op(kind: OpKind, count: i64) -> Self {
        Node::Op { kind, count }
    }
}

/// Top-level sequence of compiled nodes. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    nodes: Vec<Node>,
}

impl Program {
    pub(crate) fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total node count across all nesting levels, loops included.
    pub fn node_count(&self) -> usize {
        fn count(nodes: &[Node]) -> usize {
            nodes
                .iter()
                .map(|n| match n {
                    Node::Op { .. } => 1,
                    Node::Loop(body) => 1 + count(body),
                })
                .sum()
        }
        count(&self.nodes)
    }

    pub fn loop_count(&self) -> usize {
        fn count(nodes: &[Node]) -> usize {
            nodes
                .iter()
                .map(|n| match n {
                    Node::Op { .. } => 0,
                    Node::Loop(body) => 1 + count(body),
                })
                .sum()
        }
        count(&self.nodes)
    }
}

impl fmt::Display for Program {
    /// One node per line, loop bodies indented by two spaces:
    ///
    /// ```text
    /// add 2
    /// move 1
    /// loop
    ///   move -1
    /// end
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_nodes(f: &mut fmt::Formatter<'_>, nodes: &[Node], depth: usize) -> fmt::Result {
            for node in nodes {
                let indent = depth * 2;
                match node {
                    Node::Op { kind, count } => {
                        writeln!(f, "{:indent$}{} {}", "", kind.mnemonic(), count)?;
                    }
                    Node::Loop(body) => {
                        writeln!(f, "{:indent$}loop", "")?;
                        write_nodes(f, body, depth + 1)?;
                        writeln!(f, "{:indent$}end", "")?;
                    }
                }
            }
            Ok(())
        }
        write_nodes(f, &self.nodes, 0)
    }
}
