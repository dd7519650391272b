//! Determines which registers a lifted function consumes as arguments.
//!
//! For every tracked register at every block boundary this analysis computes
//! one of three values: the register is definitely an incoming argument
//! ([`RegisterUsage::Yes`], it is read before any write), definitely
//! overwritten before any read ([`RegisterUsage::Unknown`]), or undetermined
//! ([`RegisterUsage::Maybe`]). Function-signature recovery consumes the
//! converged states to decide which argument registers are live at entry.

use crate::analysis::abi::{AbiAnalysis, TransferEvent};
use crate::analysis::fixed_point::{fixed_point, BlockStates, Direction, FixedPointAnalysis};
use crate::analysis::lattice::{Lattice, RegisterState};
use crate::architecture::Architecture;
use crate::il;
use crate::Error;
use std::fmt;

/// The three-valued usage classification of one register.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RegisterUsage {
    /// Nothing is known about the register yet.
    Maybe,
    /// The register is overwritten before any read reaches it.
    Unknown,
    /// The register is read before any write; it carries an argument.
    Yes,
}

impl RegisterUsage {
    /// Apply one abstract event to this value.
    ///
    /// `Read` promotes `Maybe` to `Yes` and never demotes. `Write` and
    /// `WeakWrite` share one rule: they demote `Maybe` to `Unknown` but
    /// cannot retract a proven `Yes`. Every other event, `TheCall` included,
    /// is an identity for this lattice.
    pub fn transfer(self, event: TransferEvent) -> RegisterUsage {
        match event {
            TransferEvent::Read => match self {
                RegisterUsage::Maybe => RegisterUsage::Yes,
                RegisterUsage::Yes => RegisterUsage::Yes,
                RegisterUsage::Unknown => RegisterUsage::Unknown,
            },
            TransferEvent::Write | TransferEvent::WeakWrite => match self {
                RegisterUsage::Maybe => RegisterUsage::Unknown,
                RegisterUsage::Yes => RegisterUsage::Yes,
                RegisterUsage::Unknown => RegisterUsage::Unknown,
            },
            _ => self,
        }
    }
}

impl Lattice for RegisterUsage {
    fn default_value() -> RegisterUsage {
        RegisterUsage::Maybe
    }

    fn is_less_or_equal(&self, other: &RegisterUsage) -> bool {
        self == other
            || matches!(
                (self, other),
                (RegisterUsage::Maybe, RegisterUsage::Yes)
                    | (RegisterUsage::Unknown, RegisterUsage::Maybe)
                    | (RegisterUsage::Unknown, RegisterUsage::Yes)
            )
    }

    // The join is left-biased: unordered pairs resolve in favor of the
    // left-hand operand. Downstream consumers depend on the exact bias, so
    // do not symmetrize it.
    fn combine(&self, other: &RegisterUsage) -> RegisterUsage {
        match (self, other) {
            (RegisterUsage::Maybe, RegisterUsage::Unknown)
            | (RegisterUsage::Unknown, RegisterUsage::Maybe) => RegisterUsage::Maybe,
            (RegisterUsage::Maybe, RegisterUsage::Yes)
            | (RegisterUsage::Unknown, RegisterUsage::Yes)
            | (RegisterUsage::Yes, RegisterUsage::Maybe)
            | (RegisterUsage::Yes, RegisterUsage::Unknown) => RegisterUsage::Yes,
            _ => *self,
        }
    }
}

impl fmt::Display for RegisterUsage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RegisterUsage::Maybe => write!(f, "Maybe"),
            RegisterUsage::Unknown => write!(f, "Unknown"),
            RegisterUsage::Yes => write!(f, "Yes"),
        }
    }
}

/// The used-arguments analysis: the shared ABI classifier instantiated over
/// the `RegisterUsage` lattice.
#[derive(Clone, Debug)]
pub struct UsedArguments {
    abi: AbiAnalysis,
}

impl UsedArguments {
    /// A forward used-arguments analysis with no distinguished call.
    pub fn new(architecture: &dyn Architecture) -> UsedArguments {
        UsedArguments {
            abi: AbiAnalysis::new(architecture, None, Direction::Forward),
        }
    }

    /// A used-arguments analysis configured around one call site.
    pub fn with_call_site(
        architecture: &dyn Architecture,
        call_site: il::InstructionLocation,
        direction: Direction,
    ) -> UsedArguments {
        UsedArguments {
            abi: AbiAnalysis::new(architecture, Some(call_site), direction),
        }
    }

    /// The underlying classifier instance.
    pub fn abi(&self) -> &AbiAnalysis {
        &self.abi
    }

    /// Transform the state flowing into a block into the state flowing out.
    ///
    /// Instructions are visited in execution order, or reverse execution
    /// order for a backward instance. The distinguished call applies its
    /// transfer to every tracked register, not just its own operands; for
    /// this lattice that transfer is an identity, but lattices reusing the
    /// classifier rely on the whole-catalog traversal.
    pub fn apply_transfer_function(
        &self,
        block: &il::Block,
        state: &RegisterState<RegisterUsage>,
    ) -> RegisterState<RegisterUsage> {
        let mut state = state.clone();
        let instructions = block.instructions();

        for i in 0..instructions.len() {
            let instruction = match self.abi.direction() {
                Direction::Forward => &instructions[i],
                Direction::Backward => &instructions[instructions.len() - 1 - i],
            };

            match self.abi.classify(block, instruction) {
                TransferEvent::TheCall => {
                    for register in self.abi.registers() {
                        let value = state.value(register).transfer(TransferEvent::TheCall);
                        state.set(register.clone(), value);
                    }
                }
                TransferEvent::Read => {
                    if let Some(register) = self.abi.registers_read(instruction) {
                        let value = state.value(register).transfer(TransferEvent::Read);
                        state.set(register.clone(), value);
                    }
                }
                event @ (TransferEvent::Write | TransferEvent::WeakWrite) => {
                    if let Some(register) = self.abi.registers_written(instruction) {
                        let value = state.value(register).transfer(event);
                        state.set(register.clone(), value);
                    }
                }
                _ => {}
            }
        }

        state
    }
}

impl FixedPointAnalysis<RegisterState<RegisterUsage>> for UsedArguments {
    fn join(
        &self,
        state0: RegisterState<RegisterUsage>,
        state1: &RegisterState<RegisterUsage>,
    ) -> Result<RegisterState<RegisterUsage>, Error> {
        Ok(state0.combine(state1))
    }

    fn transfer(
        &self,
        block: &il::Block,
        state: &RegisterState<RegisterUsage>,
    ) -> Result<RegisterState<RegisterUsage>, Error> {
        Ok(self.apply_transfer_function(block, state))
    }

    fn default_state(&self) -> RegisterState<RegisterUsage> {
        RegisterState::new()
    }

    fn direction(&self) -> Direction {
        self.abi.direction()
    }
}

/// Compute used arguments for the given function.
///
/// Returns the converged per-block register states. The state flowing into
/// the entry block classifies each of the architecture's registers as an
/// argument (`Yes`), dead at entry (`Unknown`), or undetermined (`Maybe`)
/// once propagated; consumers usually read the state at the block containing
/// the point they care about.
pub fn used_arguments(
    function: &il::Function,
    architecture: &dyn Architecture,
) -> Result<BlockStates<RegisterState<RegisterUsage>>, Error> {
    let analysis = UsedArguments::new(architecture);
    fixed_point(&analysis, function.control_flow_graph())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::abi::{POST_CALL_HOOK, PRE_CALL_HOOK};
    use crate::architecture::Amd64;

    const USAGES: [RegisterUsage; 3] = [
        RegisterUsage::Maybe,
        RegisterUsage::Unknown,
        RegisterUsage::Yes,
    ];

    fn rdi() -> il::Register {
        il::register("rdi", 64)
    }

    fn analysis() -> UsedArguments {
        UsedArguments::new(&Amd64::new())
    }

    #[test]
    fn combine_is_an_upper_bound() {
        for lhs in USAGES {
            for rhs in USAGES {
                let combined = lhs.combine(&rhs);
                assert!(lhs.is_less_or_equal(&combined), "{} v {}", lhs, rhs);
                assert!(rhs.is_less_or_equal(&combined), "{} v {}", lhs, rhs);
            }
        }
    }

    #[test]
    fn combine_is_idempotent() {
        for usage in USAGES {
            assert_eq!(usage.combine(&usage), usage);
        }
    }

    #[test]
    fn read_never_demotes() {
        for usage in USAGES {
            assert!(usage.is_less_or_equal(&usage.transfer(TransferEvent::Read)));
        }
    }

    #[test]
    fn writes_cannot_retract_a_proven_yes() {
        assert_eq!(
            RegisterUsage::Yes.transfer(TransferEvent::Write),
            RegisterUsage::Yes
        );
        assert_eq!(
            RegisterUsage::Yes.transfer(TransferEvent::WeakWrite),
            RegisterUsage::Yes
        );
    }

    #[test]
    fn legacy_events_are_identities() {
        for usage in USAGES {
            for event in [
                TransferEvent::TheCall,
                TransferEvent::None,
                TransferEvent::ReturnFromYes,
                TransferEvent::ReturnFromMaybe,
                TransferEvent::ReturnFromNoOrDead,
                TransferEvent::ReturnFromUnknown,
                TransferEvent::UnknownFunctionCall,
            ] {
                assert_eq!(usage.transfer(event), usage);
            }
        }
    }

    #[test]
    fn read_before_write_proves_an_argument() {
        // load rdi; store rdi: the read promotes Maybe to Yes, and the
        // following write cannot demote it.
        let mut control_flow_graph = il::ControlFlowGraph::new();
        let block = control_flow_graph.new_block().unwrap();
        let tmp = block.temp(64);
        block.load(tmp.clone(), rdi());
        block.store(rdi(), tmp);

        let state = analysis().apply_transfer_function(block, &RegisterState::new());
        assert_eq!(state.value(&rdi()), RegisterUsage::Yes);
    }

    #[test]
    fn write_before_read_is_unknown() {
        let mut control_flow_graph = il::ControlFlowGraph::new();
        let block = control_flow_graph.new_block().unwrap();
        block.store(rdi(), il::const_(0, 64));

        let state = analysis().apply_transfer_function(block, &RegisterState::new());
        assert_eq!(state.value(&rdi()), RegisterUsage::Unknown);
    }

    #[test]
    fn join_of_yes_and_unknown_is_yes() {
        let mut state0 = RegisterState::new();
        state0.set(rdi(), RegisterUsage::Yes);
        let mut state1 = RegisterState::new();
        state1.set(rdi(), RegisterUsage::Unknown);

        assert_eq!(state0.combine(&state1).value(&rdi()), RegisterUsage::Yes);
        assert_eq!(state1.combine(&state0).value(&rdi()), RegisterUsage::Yes);
    }

    #[test]
    fn weak_writes_transfer_like_ordinary_writes() {
        let mut control_flow_graph = il::ControlFlowGraph::new();

        let call_site_index = {
            let block = control_flow_graph.new_block().unwrap();
            block.call(PRE_CALL_HOOK);
            block.store(rdi(), il::const_(1, 64));
            block.call(POST_CALL_HOOK);
            block.nop();
            block.index()
        };

        let plain_index = {
            let block = control_flow_graph.new_block().unwrap();
            block.store(rdi(), il::const_(1, 64));
            block.index()
        };

        let analysis = analysis();
        let start = RegisterState::new();

        let call_site_block = control_flow_graph.block(call_site_index).unwrap();
        let store = &call_site_block.instructions()[1];
        assert_eq!(
            analysis.abi().classify(call_site_block, store),
            TransferEvent::WeakWrite
        );

        let weak = analysis.apply_transfer_function(call_site_block, &start);
        assert_eq!(weak.value(&rdi()), RegisterUsage::Unknown);

        // This lattice defines identical rules for Write and WeakWrite, so
        // the bracketed store must land exactly where an ordinary one does.
        let plain_block = control_flow_graph.block(plain_index).unwrap();
        let ordinary = analysis.apply_transfer_function(plain_block, &start);
        assert_eq!(weak.value(&rdi()), ordinary.value(&rdi()));
    }

    #[test]
    fn blocks_without_tracked_registers_transfer_as_identity() {
        let mut control_flow_graph = il::ControlFlowGraph::new();

        let empty_index = control_flow_graph.new_block().unwrap().index();

        let untracked_index = {
            let block = control_flow_graph.new_block().unwrap();
            block.store(il::register("stack_16", 64), il::const_(0, 64));
            let tmp = block.temp(64);
            block.load(tmp.clone(), il::register("fs_base", 64));
            block.branch(tmp);
            block.index()
        };

        let analysis = analysis();
        let mut state = RegisterState::new();
        state.set(rdi(), RegisterUsage::Yes);
        state.set(il::register("rsi", 64), RegisterUsage::Unknown);

        let empty_block = control_flow_graph.block(empty_index).unwrap();
        assert_eq!(analysis.apply_transfer_function(empty_block, &state), state);

        let untracked_block = control_flow_graph.block(untracked_index).unwrap();
        assert_eq!(
            analysis.apply_transfer_function(untracked_block, &state),
            state
        );
    }

    #[test]
    fn the_call_touches_every_tracked_register() {
        let mut control_flow_graph = il::ControlFlowGraph::new();
        let block = control_flow_graph.new_block().unwrap();
        block.call("callee");
        let block_index = block.index();

        let architecture = Amd64::new();
        let call_site = il::InstructionLocation::new(block_index, 0);
        let analysis =
            UsedArguments::with_call_site(&architecture, call_site, Direction::Forward);

        let block = control_flow_graph.block(block_index).unwrap();
        assert_eq!(
            analysis.abi().classify(block, &block.instructions()[0]),
            TransferEvent::TheCall
        );

        // TheCall is an identity for this lattice, but the traversal still
        // materializes an entry for every register in the catalog.
        let state = analysis.apply_transfer_function(block, &RegisterState::new());
        assert_eq!(state.len(), architecture.abi_registers().len());
        for register in architecture.abi_registers() {
            assert_eq!(state.value(&register), RegisterUsage::Maybe);
        }
    }

    #[test]
    fn backward_instances_walk_blocks_in_reverse() {
        // store rdi; load rdi. Forward, the write lands first and pins the
        // register at Unknown. Backward, the read is visited first and
        // proves Yes.
        let mut control_flow_graph = il::ControlFlowGraph::new();
        let block = control_flow_graph.new_block().unwrap();
        block.store(rdi(), il::const_(0, 64));
        let tmp = block.temp(64);
        block.load(tmp, rdi());
        let block_index = block.index();

        let architecture = Amd64::new();
        let call_site = il::InstructionLocation::new(block_index, 0);
        let block = control_flow_graph.block(block_index).unwrap();

        let forward =
            UsedArguments::with_call_site(&architecture, call_site, Direction::Forward);
        let state = forward.apply_transfer_function(block, &RegisterState::new());
        assert_eq!(state.value(&rdi()), RegisterUsage::Unknown);

        let backward =
            UsedArguments::with_call_site(&architecture, call_site, Direction::Backward);
        let state = backward.apply_transfer_function(block, &RegisterState::new());
        assert_eq!(state.value(&rdi()), RegisterUsage::Yes);
    }

    #[test]
    fn used_arguments_over_a_diamond() {
        /*
            entry:  load rdi
            lt:     store rsi
            ge:     load rsi; store rsi
            tail:   store rdx
        */
        let mut control_flow_graph = il::ControlFlowGraph::new();

        let entry_index = {
            let block = control_flow_graph.new_block().unwrap();
            let tmp = block.temp(64);
            block.load(tmp, il::register("rdi", 64));
            block.index()
        };

        let lt_index = {
            let block = control_flow_graph.new_block().unwrap();
            block.store(il::register("rsi", 64), il::const_(0, 64));
            block.index()
        };

        let ge_index = {
            let block = control_flow_graph.new_block().unwrap();
            let tmp = block.temp(64);
            block.load(tmp.clone(), il::register("rsi", 64));
            block.store(il::register("rsi", 64), tmp);
            block.index()
        };

        let tail_index = {
            let block = control_flow_graph.new_block().unwrap();
            block.store(il::register("rdx", 64), il::const_(0, 64));
            block.index()
        };

        control_flow_graph
            .unconditional_edge(entry_index, lt_index)
            .unwrap();
        control_flow_graph
            .unconditional_edge(entry_index, ge_index)
            .unwrap();
        control_flow_graph
            .unconditional_edge(lt_index, tail_index)
            .unwrap();
        control_flow_graph
            .unconditional_edge(ge_index, tail_index)
            .unwrap();
        control_flow_graph.set_entry(entry_index).unwrap();

        let function = il::Function::new(0, control_flow_graph);
        let states = used_arguments(&function, &Amd64::new()).unwrap();

        let tail_output = states.output(tail_index).unwrap();
        // rdi is read on every path before any write.
        assert_eq!(tail_output.value(&il::register("rdi", 64)), RegisterUsage::Yes);
        // rsi is overwritten on one path and read on the other; the read
        // wins at the join.
        assert_eq!(tail_output.value(&il::register("rsi", 64)), RegisterUsage::Yes);
        // rdx is written before any read.
        assert_eq!(
            tail_output.value(&il::register("rdx", 64)),
            RegisterUsage::Unknown
        );
        // rax is never touched.
        assert_eq!(
            tail_output.value(&il::register("rax", 64)),
            RegisterUsage::Maybe
        );
    }

    #[test]
    fn results_do_not_depend_on_block_visit_order() {
        // The exit block gets a lower index than the entry block, so a
        // worklist seeded in index order visits it before any predecessor
        // information exists. The converged result must be the same as if
        // the entry had been visited first.
        let mut control_flow_graph = il::ControlFlowGraph::new();

        let exit_index = {
            let block = control_flow_graph.new_block().unwrap();
            let tmp = block.temp(64);
            block.load(tmp, il::register("rax", 64));
            block.index()
        };

        let entry_index = {
            let block = control_flow_graph.new_block().unwrap();
            block.store(il::register("rax", 64), il::const_(0, 64));
            block.index()
        };

        control_flow_graph
            .unconditional_edge(entry_index, exit_index)
            .unwrap();
        control_flow_graph.set_entry(entry_index).unwrap();

        let function = il::Function::new(0, control_flow_graph);
        let states = used_arguments(&function, &Amd64::new()).unwrap();

        // rax is overwritten at entry before the exit block reads it.
        assert_eq!(
            states.output(exit_index).unwrap().value(&il::register("rax", 64)),
            RegisterUsage::Unknown
        );
    }

    #[test]
    fn backward_solves_propagate_against_edge_direction() {
        /*
            entry:  store rax
            tail:   load rdi
        */
        let mut control_flow_graph = il::ControlFlowGraph::new();

        let entry_index = {
            let block = control_flow_graph.new_block().unwrap();
            block.store(il::register("rax", 64), il::const_(0, 64));
            block.index()
        };

        let tail_index = {
            let block = control_flow_graph.new_block().unwrap();
            let tmp = block.temp(64);
            block.load(tmp, il::register("rdi", 64));
            block.index()
        };

        control_flow_graph
            .unconditional_edge(entry_index, tail_index)
            .unwrap();
        control_flow_graph.set_entry(entry_index).unwrap();

        let architecture = Amd64::new();
        let call_site = il::InstructionLocation::new(entry_index, 0);
        let analysis =
            UsedArguments::with_call_site(&architecture, call_site, Direction::Backward);
        let states = fixed_point(&analysis, &control_flow_graph).unwrap();

        // Information flows from the tail back to the entry.
        let entry_output = states.output(entry_index).unwrap();
        assert_eq!(
            entry_output.value(&il::register("rdi", 64)),
            RegisterUsage::Yes
        );
        assert_eq!(
            entry_output.value(&il::register("rax", 64)),
            RegisterUsage::Unknown
        );

        // Nothing flows from the entry into the tail.
        let tail_output = states.output(tail_index).unwrap();
        assert_eq!(
            tail_output.value(&il::register("rdi", 64)),
            RegisterUsage::Yes
        );
        assert_eq!(
            tail_output.value(&il::register("rax", 64)),
            RegisterUsage::Maybe
        );
    }

    #[test]
    fn used_arguments_converges_over_a_loop() {
        /*
            entry:  store rax
            body:   load rdi; store rdi    (loops back to itself)
            exit:   load rax
        */
        let mut control_flow_graph = il::ControlFlowGraph::new();

        let entry_index = {
            let block = control_flow_graph.new_block().unwrap();
            block.store(il::register("rax", 64), il::const_(0, 64));
            block.index()
        };

        let body_index = {
            let block = control_flow_graph.new_block().unwrap();
            let tmp = block.temp(64);
            block.load(tmp.clone(), il::register("rdi", 64));
            block.store(il::register("rdi", 64), tmp);
            block.index()
        };

        let exit_index = {
            let block = control_flow_graph.new_block().unwrap();
            let tmp = block.temp(64);
            block.load(tmp, il::register("rax", 64));
            block.index()
        };

        control_flow_graph
            .unconditional_edge(entry_index, body_index)
            .unwrap();
        control_flow_graph
            .unconditional_edge(body_index, body_index)
            .unwrap();
        control_flow_graph
            .unconditional_edge(body_index, exit_index)
            .unwrap();
        control_flow_graph.set_entry(entry_index).unwrap();

        let function = il::Function::new(0, control_flow_graph);
        let states = used_arguments(&function, &Amd64::new()).unwrap();

        let exit_output = states.output(exit_index).unwrap();
        // rdi is read before it is written in the loop body.
        assert_eq!(
            exit_output.value(&il::register("rdi", 64)),
            RegisterUsage::Yes
        );
        // rax is written at entry; the later read cannot resurrect it.
        assert_eq!(
            exit_output.value(&il::register("rax", 64)),
            RegisterUsage::Unknown
        );
    }
}
