//! An `Edge` is a directed edge between `Block`s in a `ControlFlowGraph`.
//!
//! Direct branches are not lifted as `Operation`s; control flow between
//! blocks is expressed entirely through edges. Create edges by calling
//! `ControlFlowGraph::unconditional_edge`.

use crate::graph;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Edge between IL blocks.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Default)]
pub struct Edge {
    head: usize,
    tail: usize,
    comment: Option<String>,
}

impl Edge {
    pub(crate) fn new(head: usize, tail: usize) -> Edge {
        Edge {
            head,
            tail,
            comment: None,
        }
    }

    /// Retrieve the index of the head `Block` for this `Edge`.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Retrieve the index of the tail `Block` for this `Edge`.
    pub fn tail(&self) -> usize {
        self.tail
    }

    /// Set the comment for this `Edge`.
    pub fn set_comment(&mut self, comment: Option<String>) {
        self.comment = comment;
    }

    /// Get the comment for this `Edge`.
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

impl graph::Edge for Edge {
    fn head(&self) -> usize {
        self.head
    }
    fn tail(&self) -> usize {
        self.tail
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(ref comment) = self.comment {
            writeln!(f, "// {}", comment)?
        }
        write!(f, "(0x{:X}->0x{:X})", self.head, self.tail)
    }
}
