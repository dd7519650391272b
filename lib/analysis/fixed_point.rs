//! A generic worklist solver for dataflow analyses over a `ControlFlowGraph`.
//!
//! The solver iterates block-level transfer functions over the graph until
//! the per-block states converge. It knows nothing about the lattice beyond
//! the operations on [`FixedPointAnalysis`]; the analysis supplies the join,
//! the transfer function, and the default element, and the solver supplies
//! the iteration strategy.

use crate::il;
use crate::Error;
use log::trace;
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::fmt::Debug;

/// The direction a dataflow analysis traverses the control-flow graph.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    /// Information flows from the entry towards the exits, along plain
    /// successor edges.
    Forward,
    /// Information flows from the exits towards the entry, along inverted
    /// successor edges.
    Backward,
}

/// A dataflow analysis solvable by `fixed_point`.
///
/// `State` is the lattice element attached to each block boundary. The
/// solver never mutates a recorded state; `transfer` receives a reference
/// and returns a fresh state.
pub trait FixedPointAnalysis<State: Clone + Debug + Eq> {
    /// Join two states flowing into the same block boundary.
    ///
    /// The left-hand state is the accumulator; analyses with a left-biased
    /// join resolve ties in its favor.
    fn join(&self, state0: State, state1: &State) -> Result<State, Error>;

    /// Transform the state flowing into a block into the state flowing out.
    ///
    /// "Into" and "out of" are relative to this analysis's direction: a
    /// backward analysis receives the state after the block and produces the
    /// state before it.
    fn transfer(&self, block: &il::Block, state: &State) -> Result<State, Error>;

    /// The state attached to a boundary no information has reached yet.
    fn default_state(&self) -> State;

    /// The direction this analysis traverses the graph.
    fn direction(&self) -> Direction;
}

/// Converged per-block states computed by `fixed_point`.
///
/// `input` holds the state flowing into each block's transfer function and
/// `output` the state flowing out, both in the analysis's direction. For a
/// forward analysis `input` is the block entry state and `output` the block
/// exit state; for a backward analysis the roles are reversed.
#[derive(Clone, Debug)]
pub struct BlockStates<State> {
    input: FxHashMap<usize, State>,
    output: FxHashMap<usize, State>,
}

impl<State> BlockStates<State> {
    /// The converged state flowing into the given block.
    pub fn input(&self, block_index: usize) -> Option<&State> {
        self.input.get(&block_index)
    }

    /// The converged state flowing out of the given block.
    pub fn output(&self, block_index: usize) -> Option<&State> {
        self.output.get(&block_index)
    }
}

/// Solve the given analysis over a `ControlFlowGraph` to a fixed point.
pub fn fixed_point<Analysis, State>(
    analysis: &Analysis,
    control_flow_graph: &il::ControlFlowGraph,
) -> Result<BlockStates<State>, Error>
where
    Analysis: FixedPointAnalysis<State>,
    State: Clone + Debug + Eq,
{
    let mut input: FxHashMap<usize, State> = FxHashMap::default();
    let mut output: FxHashMap<usize, State> = FxHashMap::default();

    let mut queue: VecDeque<usize> = VecDeque::new();
    for block in control_flow_graph.blocks() {
        queue.push_back(block.index());
    }

    let direction = analysis.direction();

    while let Some(block_index) = queue.pop_front() {
        // The blocks whose output feeds this block, and the blocks this
        // block's output feeds, under the analysis's direction.
        let (sources, sinks) = match direction {
            Direction::Forward => (
                control_flow_graph.predecessor_indices(block_index)?,
                control_flow_graph.successor_indices(block_index)?,
            ),
            Direction::Backward => (
                control_flow_graph.successor_indices(block_index)?,
                control_flow_graph.predecessor_indices(block_index)?,
            ),
        };

        let in_state = {
            let mut in_state: Option<State> = None;
            for source in sources {
                if let Some(state) = output.get(&source) {
                    in_state = Some(match in_state {
                        Some(in_state) => analysis.join(in_state, state)?,
                        None => state.clone(),
                    });
                }
            }
            in_state.unwrap_or_else(|| analysis.default_state())
        };

        let block = control_flow_graph.block(block_index)?;
        let out_state = analysis.transfer(block, &in_state)?;

        // Blocks are seeded in index order, so an early visit can record a
        // state computed from incomplete source information. Stability is
        // equality with the recorded state, nothing weaker; a recomputed
        // state must be able to replace a stale one in either direction.
        if let Some(recorded) = output.get(&block_index) {
            if out_state == *recorded {
                input.insert(block_index, in_state);
                continue;
            }
        }

        trace!("fixed_point: block 0x{:X} updated", block_index);

        input.insert(block_index, in_state);
        output.insert(block_index, out_state);

        for sink in sinks {
            if !queue.contains(&sink) {
                queue.push_back(sink);
            }
        }
    }

    Ok(BlockStates { input, output })
}
