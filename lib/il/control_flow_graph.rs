//! A `ControlFlowGraph` is a directed `Graph` of `Block` and `Edge`.

use crate::il::*;
use crate::{graph, Error};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A directed graph of types `Block` and `Edge`.
///
/// The `entry` index distinguishes the block where execution of the lifted
/// function begins. Analyses which traverse the graph backwards simply invert
/// the edge relation; there is no separate exit marker.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, Default)]
pub struct ControlFlowGraph {
    // The internal graph used to store our blocks.
    graph: graph::Graph<Block, Edge>,
    // The next index to use when creating a basic block.
    next_index: usize,
    // An optional entry index for the graph.
    entry: Option<usize>,
}

impl ControlFlowGraph {
    pub fn new() -> ControlFlowGraph {
        ControlFlowGraph {
            graph: graph::Graph::new(),
            next_index: 0,
            entry: None,
        }
    }

    /// Returns the underlying graph.
    pub fn graph(&self) -> &graph::Graph<Block, Edge> {
        &self.graph
    }

    /// Sets the entry point for this `ControlFlowGraph` to the given `Block`
    /// index.
    pub fn set_entry(&mut self, entry: usize) -> Result<(), Error> {
        if !self.graph.has_vertex(entry) {
            return Err(Error::GraphVertexNotFound(entry));
        }
        self.entry = Some(entry);
        Ok(())
    }

    /// Get the entry `Block` index for this `ControlFlowGraph`.
    pub fn entry(&self) -> Option<usize> {
        self.entry
    }

    /// Returns the entry block for this `ControlFlowGraph`.
    pub fn entry_block(&self) -> Result<&Block, Error> {
        self.block(self.entry.ok_or(Error::ControlFlowGraphEntryNotSet)?)
    }

    /// Get a `Block` by index.
    pub fn block(&self, index: usize) -> Result<&Block, Error> {
        self.graph.vertex(index)
    }

    /// Get a mutable reference to a `Block` by index.
    pub fn block_mut(&mut self, index: usize) -> Result<&mut Block, Error> {
        self.graph.vertex_mut(index)
    }

    /// Get every `Block` in this `ControlFlowGraph`.
    pub fn blocks(&self) -> Vec<&Block> {
        self.graph.vertices()
    }

    /// Get a mutable reference to every `Block` in this `ControlFlowGraph`.
    pub fn blocks_mut(&mut self) -> Vec<&mut Block> {
        self.graph.vertices_mut()
    }

    /// Get an `Edge` by its head and tail `Block` indices.
    pub fn edge(&self, head: usize, tail: usize) -> Result<&Edge, Error> {
        self.graph.edge(head, tail)
    }

    /// Get every `Edge` in this `ControlFlowGraph`.
    pub fn edges(&self) -> Vec<&Edge> {
        self.graph.edges()
    }

    /// Get every incoming edge to a block.
    pub fn edges_in(&self, index: usize) -> Result<Vec<&Edge>, Error> {
        self.graph.edges_in(index)
    }

    /// Get every outgoing edge from a block.
    pub fn edges_out(&self, index: usize) -> Result<Vec<&Edge>, Error> {
        self.graph.edges_out(index)
    }

    /// Get the indices of every predecessor of a `Block` in this
    /// `ControlFlowGraph`.
    pub fn predecessor_indices(&self, index: usize) -> Result<Vec<usize>, Error> {
        self.graph.predecessor_indices(index)
    }

    /// Get the indices of every successor of a `Block` in this
    /// `ControlFlowGraph`.
    pub fn successor_indices(&self, index: usize) -> Result<Vec<usize>, Error> {
        self.graph.successor_indices(index)
    }

    /// Creates a new basic block, adds it to the graph, and returns it.
    pub fn new_block(&mut self) -> Result<&mut Block, Error> {
        let next_index = self.next_index;
        self.next_index += 1;
        let block = Block::new(next_index);
        self.graph.insert_vertex(block)?;
        self.graph.vertex_mut(next_index)
    }

    /// Creates an unconditional edge from one block to another block.
    pub fn unconditional_edge(&mut self, head: usize, tail: usize) -> Result<(), Error> {
        self.graph.insert_edge(Edge::new(head, tail))
    }

    /// Sets the address for all instructions in this `ControlFlowGraph`.
    ///
    /// Useful for lifters to set address information.
    pub fn set_address(&mut self, address: Option<u64>) {
        for block in self.blocks_mut() {
            for instruction in block.instructions_mut() {
                instruction.set_address(address);
            }
        }
    }
}

impl fmt::Display for ControlFlowGraph {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for block in self.blocks() {
            writeln!(f, "{}", block)?;
        }
        for edge in self.edges() {
            writeln!(f, "edge {}", edge)?;
        }
        Ok(())
    }
}
