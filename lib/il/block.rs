use crate::graph;
use crate::il::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A basic block.
///
/// Instructions are appended through the builder methods, which assign
/// block-unique instruction indices. When a block ends in control flow, the
/// terminating instruction (a `Branch`, or the call-return plumbing a lifter
/// emits) is the final instruction of the block; fall-through control flow is
/// expressed purely through `Edge`s.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Block {
    /// The index of the block.
    index: usize,
    /// An internal counter for the next block-unique instruction index.
    next_instruction_index: u64,
    /// An internal counter for the next block-unique temporary.
    next_temp_index: u64,
    /// The instructions for this block.
    instructions: Vec<Instruction>,
}

impl Block {
    pub(crate) fn new(index: usize) -> Block {
        Block {
            index,
            next_instruction_index: 0,
            next_temp_index: 0,
            instructions: Vec::new(),
        }
    }

    fn new_instruction_index(&mut self) -> u64 {
        let instruction_index = self.next_instruction_index;
        self.next_instruction_index = instruction_index + 1;
        instruction_index
    }

    fn push(&mut self, operation: Operation) {
        let index = self.new_instruction_index();
        self.instructions.push(Instruction::new(index, operation));
    }

    /// Returns the index of this block.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns this block's instructions, in execution order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn instructions_mut(&mut self) -> &mut Vec<Instruction> {
        &mut self.instructions
    }

    /// Returns an instruction by its block-unique index.
    pub fn instruction(&self, index: u64) -> Option<&Instruction> {
        self.instructions
            .iter()
            .find(|instruction| instruction.index() == index)
    }

    /// Returns true if this block holds no instructions.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Generates a temporary unique to this block.
    pub fn temp(&mut self, bits: usize) -> Temp {
        let next_index = self.next_temp_index;
        self.next_temp_index = next_index + 1;
        Temp::new(format!("temp_{}.{}", self.index, next_index), bits)
    }

    /// Adds a load operation to the end of this block.
    pub fn load(&mut self, dst: Temp, src: Register) {
        self.push(Operation::load(dst, src));
    }

    /// Adds a store operation to the end of this block.
    pub fn store<V>(&mut self, dst: Register, src: V)
    where
        V: Into<Value>,
    {
        self.push(Operation::store(dst, src.into()));
    }

    /// Adds a direct call operation to the end of this block.
    pub fn call<S>(&mut self, target: S)
    where
        S: Into<String>,
    {
        self.push(Operation::call(CallTarget::Direct(target.into())));
    }

    /// Adds an indirect call operation to the end of this block.
    pub fn indirect_call<V>(&mut self, target: V)
    where
        V: Into<Value>,
    {
        self.push(Operation::call(CallTarget::Indirect(target.into())));
    }

    /// Adds a branch operation to the end of this block.
    pub fn branch<V>(&mut self, target: V)
    where
        V: Into<Value>,
    {
        self.push(Operation::branch(target.into()));
    }

    /// Adds a nop to the end of this block.
    pub fn nop(&mut self) {
        self.push(Operation::nop());
    }
}

impl graph::Vertex for Block {
    fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "[ Block: 0x{:X} ]", self.index)?;
        for instruction in self.instructions() {
            writeln!(f, "{}", instruction)?;
        }
        Ok(())
    }
}
