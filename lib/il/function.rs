use crate::il::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A `Function` applies location to a `ControlFlowGraph`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Function {
    // The address where this function was found.
    address: u64,
    // The `ControlFlowGraph` capturing the semantics of the function.
    control_flow_graph: ControlFlowGraph,
    // The name of the function.
    name: Option<String>,
}

impl Function {
    pub fn new(address: u64, control_flow_graph: ControlFlowGraph) -> Function {
        Function {
            address,
            control_flow_graph,
            name: None,
        }
    }

    pub fn address(&self) -> u64 {
        self.address
    }

    pub fn block(&self, index: usize) -> Result<&Block, crate::Error> {
        self.control_flow_graph.block(index)
    }

    pub fn blocks(&self) -> Vec<&Block> {
        self.control_flow_graph.blocks()
    }

    pub fn control_flow_graph(&self) -> &ControlFlowGraph {
        &self.control_flow_graph
    }

    pub fn control_flow_graph_mut(&mut self) -> &mut ControlFlowGraph {
        &mut self.control_flow_graph
    }

    pub fn name(&self) -> String {
        match self.name {
            Some(ref name) => name.to_string(),
            None => format!("unknown@{:08X}", self.address),
        }
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} @ 0x{:08X}", self.name(), self.address)?;
        write!(f, "{}", self.control_flow_graph)
    }
}
