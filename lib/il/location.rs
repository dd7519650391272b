use serde::{Deserialize, Serialize};
use std::fmt;

/// The location of an `Instruction` within a function.
///
/// Blocks carry function-unique indices and instructions carry block-unique
/// indices, so an `InstructionLocation` identifies exactly one instruction.
/// Analyses that need to single out an instruction, such as the distinguished
/// call site of an ABI analysis, refer to it by location rather than by
/// reference.
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Default,
)]
pub struct InstructionLocation {
    block: usize,
    instruction: u64,
}

impl InstructionLocation {
    pub fn new(block: usize, instruction: u64) -> InstructionLocation {
        InstructionLocation { block, instruction }
    }

    /// The index of the block holding the instruction.
    pub fn block(&self) -> usize {
        self.block
    }

    /// The block-unique index of the instruction.
    pub fn instruction(&self) -> u64 {
        self.instruction
    }
}

impl fmt::Display for InstructionLocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{:X}.{:02X}", self.block, self.instruction)
    }
}
