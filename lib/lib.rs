//! Merlin is a library for dataflow analysis over lifted binary code.
//!
//! Merlin models the output of a binary lifter as a small, well-defined
//! intermediate language, and implements the monotone-framework analyses
//! required for function-signature recovery on top of it. The centerpiece is
//! the ABI usage analysis in [`analysis::abi`], which decides, for every
//! architectural register at every program point, whether the register is
//! definitely an incoming argument, definitely overwritten before any read,
//! or undetermined.
//!
//! The crate is organized as follows:
//!
//! * [`il`] - The intermediate language: registers, operations, instructions,
//!   basic blocks, and control-flow graphs.
//! * [`graph`] - A generic directed graph underlying the control-flow graph.
//! * [`architecture`] - Register catalogs for supported architectures.
//! * [`analysis`] - Lattices, the fixed-point solver, and the ABI analyses.
//!
//! Merlin does not load or lift binaries. It consumes control-flow graphs
//! produced by a lifter, and it is the lifter's job to guarantee the
//! well-formedness documented on the analysis entry points.

pub mod analysis;
pub mod architecture;
pub mod graph;
pub mod il;

/// Error for all merlin errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Custom error: {0}")]
    Custom(String),
    #[error("The vertex {0} does not exist in the graph")]
    GraphVertexNotFound(usize),
    #[error("The edge {0}->{1} does not exist in the graph")]
    GraphEdgeNotFound(usize, usize),
    #[error("The vertex {0} already exists in the graph")]
    GraphVertexExists(usize),
    #[error("The edge {0}->{1} already exists in the graph")]
    GraphEdgeExists(usize, usize),
    #[error("The ControlFlowGraph has no entry set")]
    ControlFlowGraphEntryNotSet,
}

impl From<&str> for Error {
    fn from(error: &str) -> Error {
        Error::Custom(error.to_string())
    }
}

impl From<String> for Error {
    fn from(error: String) -> Error {
        Error::Custom(error)
    }
}
