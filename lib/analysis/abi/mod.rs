//! ABI analyses over lifted functions.
//!
//! These analyses recover calling-convention facts a lifter cannot read off
//! the binary directly, starting with which registers a function actually
//! consumes as arguments. They all share one instruction classifier, which
//! turns raw register accesses into abstract transfer events, and differ only
//! in the per-register lattice they run over those events.
//!
//! # Call-site blocks
//!
//! Lifters bracket every external call between two marker calls,
//! `precall_hook` and `postcall_hook`. A block whose first instruction calls
//! `precall_hook` is a call-site block, and the matching `postcall_hook` is
//! the instruction immediately preceding the block's terminator. A register
//! write inside that bracket models an effect of the callee, whose exact
//! clobber set is not visible locally. The classifier therefore reports such
//! writes as [`TransferEvent::WeakWrite`]: still a write, but weaker evidence
//! of a definite overwrite than an ordinary [`TransferEvent::Write`].

use crate::analysis::fixed_point::Direction;
use crate::architecture::Architecture;
use crate::il;
use std::collections::BTreeSet;

mod used_arguments;

pub use self::used_arguments::*;

/// The marker called as the first instruction of a call-site block.
pub const PRE_CALL_HOOK: &str = "precall_hook";

/// The marker called immediately before a call-site block's terminator.
pub const POST_CALL_HOOK: &str = "postcall_hook";

/// The abstract effect of one instruction on one register's state.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransferEvent {
    /// The instruction reads a tracked register.
    Read,
    /// The instruction writes a tracked register.
    Write,
    /// The instruction writes a tracked register inside a call-site bracket,
    /// where the callee may clobber registers not visible locally.
    WeakWrite,
    /// The instruction is the analysis's distinguished call.
    TheCall,
    /// The instruction touches no tracked register.
    None,
    /// Reserved for return-value analyses sharing this classifier.
    ReturnFromYes,
    /// Reserved for return-value analyses sharing this classifier.
    ReturnFromMaybe,
    /// Reserved for return-value analyses sharing this classifier.
    ReturnFromNoOrDead,
    /// Reserved for return-value analyses sharing this classifier.
    ReturnFromUnknown,
    /// Reserved for call-site analyses sharing this classifier.
    UnknownFunctionCall,
}

/// One configured run of an ABI analysis over one function.
///
/// An `AbiAnalysis` binds the registers tracked (an architecture's catalog),
/// an optional distinguished call instruction, and the direction the
/// control-flow graph is traversed. It is immutable for its lifetime;
/// independent instances, such as one per call site under scrutiny, share no
/// mutable state and may run concurrently.
#[derive(Clone, Debug)]
pub struct AbiAnalysis {
    registers: BTreeSet<il::Register>,
    register_list: Vec<il::Register>,
    call_site: Option<il::InstructionLocation>,
    direction: Direction,
}

impl AbiAnalysis {
    /// Create an `AbiAnalysis` tracking the given architecture's registers.
    pub fn new(
        architecture: &dyn Architecture,
        call_site: Option<il::InstructionLocation>,
        direction: Direction,
    ) -> AbiAnalysis {
        let register_list = architecture.abi_registers();
        let registers = register_list.iter().cloned().collect();
        AbiAnalysis {
            registers,
            register_list,
            call_site,
            direction,
        }
    }

    /// The tracked registers, in catalog order.
    pub fn registers(&self) -> &[il::Register] {
        &self.register_list
    }

    /// The distinguished call instruction, if this instance has one.
    pub fn call_site(&self) -> Option<il::InstructionLocation> {
        self.call_site
    }

    /// The direction this instance traverses the control-flow graph.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// True if the given location is a tracked register.
    ///
    /// Locations outside the catalog are ordinary non-architectural storage;
    /// instructions touching them classify as `TransferEvent::None`.
    pub fn is_abi_register(&self, register: &il::Register) -> bool {
        self.registers.contains(register)
    }

    /// Classify an instruction into the abstract event it applies.
    pub fn classify(&self, block: &il::Block, instruction: &il::Instruction) -> TransferEvent {
        match instruction.operation() {
            il::Operation::Store { dst, .. } if self.is_abi_register(dst) => {
                if is_call_site_block(block) {
                    TransferEvent::WeakWrite
                } else {
                    TransferEvent::Write
                }
            }
            il::Operation::Load { src, .. } if self.is_abi_register(src) => TransferEvent::Read,
            il::Operation::Call { .. } => {
                let location = il::InstructionLocation::new(block.index(), instruction.index());
                if self.call_site == Some(location) {
                    TransferEvent::TheCall
                } else {
                    TransferEvent::None
                }
            }
            _ => TransferEvent::None,
        }
    }

    /// The tracked register the instruction writes, if any.
    pub fn registers_written<'i>(
        &self,
        instruction: &'i il::Instruction,
    ) -> Option<&'i il::Register> {
        instruction
            .operation()
            .register_written()
            .filter(|register| self.is_abi_register(register))
    }

    /// The tracked register the instruction reads, if any.
    pub fn registers_read<'i>(
        &self,
        instruction: &'i il::Instruction,
    ) -> Option<&'i il::Register> {
        instruction
            .operation()
            .register_read()
            .filter(|register| self.is_abi_register(register))
    }
}

/// True if the given block is a call-site block.
///
/// # Panics
/// Panics if the block's first instruction is a call with no static target.
/// Lifters producing call-site brackets always emit a direct call to the
/// marker, so an unresolvable leading call means the input is malformed, and
/// callers must guarantee well-formedness before classification.
pub fn is_call_site_block(block: &il::Block) -> bool {
    match block.instructions().first().map(il::Instruction::operation) {
        Some(il::Operation::Call { target }) => match target.name() {
            Some(name) => name == PRE_CALL_HOOK,
            None => panic!(
                "block 0x{:X} starts with a call that has no static target",
                block.index()
            ),
        },
        _ => false,
    }
}

/// The `precall_hook` marker instruction of a call-site block.
pub fn pre_call_hook(block: &il::Block) -> Option<&il::Instruction> {
    if is_call_site_block(block) {
        block.instructions().first()
    } else {
        None
    }
}

/// The `postcall_hook` marker instruction of a call-site block.
///
/// The marker sits immediately before the block's terminator, which is the
/// block's final instruction.
pub fn post_call_hook(block: &il::Block) -> Option<&il::Instruction> {
    if is_call_site_block(block) {
        block.instructions().iter().rev().nth(1)
    } else {
        None
    }
}
