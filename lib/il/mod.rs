//! Merlin Intermediate Language.
//!
//! A small, well-defined intermediate language for dataflow analysis over
//! lifted binary code.
//!
//! The IL deliberately carries no value semantics beyond what the analyses
//! in this crate need: which storage locations an instruction touches, and
//! how control flows between basic blocks. Arithmetic performed between a
//! load and a store is invisible here, so a lifter targeting this IL
//! collapses it into the operands of `Store`.
//!
//! # Components of the IL
//!
//! ## `Register`, `Temp`, and `Constant`
//!
//! A `Register` names a storage location, usually an architectural register.
//! Registers are compared by identity (name and width); the set of registers
//! participating in a calling convention comes from an
//! [`Architecture`](crate::architecture::Architecture) catalog, not from the
//! IL. A `Temp` is a function-local temporary, and a `Constant` is an
//! immediate value; both can appear as operands through `Value`.
//!
//! ## `Operation`
//!
//! An `Operation` applies a transformation over some state. There are five
//! types of `Operation`:
//!
//! * `Load`: Reads a storage location into a `Temp`. The only way to observe
//!   a register's value.
//! * `Store`: Writes a `Value` into a storage location. The only way to
//!   change a register's value.
//! * `Call`: Calls a procedure, either directly by name or through a
//!   computed target. Lifters use direct calls to well-known marker names to
//!   bracket external calls; see [`analysis::abi`](crate::analysis::abi).
//! * `Branch`: Branches to a computed target, terminating a block. Direct
//!   branches are not lifted as operations; they become `Edge`s in the
//!   `ControlFlowGraph`.
//! * `Nop`: Holds a program location where no state change takes place.
//!
//! ## `Instruction`, `Block`, `Edge`, and `ControlFlowGraph`
//!
//! An `Instruction` gives a location to an `Operation` within a `Block`. A
//! `Block` is a basic block with an index that is an arbitrary location
//! within a `ControlFlowGraph`. `Edge`s connect blocks, and the
//! `ControlFlowGraph` ties it all together with an entry index.
//!
//! ## `Function`
//!
//! A `Function` holds an address and a `ControlFlowGraph`, applying location
//! within a binary to the graph.

mod block;
mod control_flow_graph;
mod edge;
mod function;
mod instruction;
mod location;
mod operation;
mod register;
mod value;

pub use self::block::*;
pub use self::control_flow_graph::*;
pub use self::edge::*;
pub use self::function::*;
pub use self::instruction::*;
pub use self::location::*;
pub use self::operation::*;
pub use self::register::*;
pub use self::value::*;

/// A convenience function to create a new register.
///
/// This is the preferred way to create a `Register`.
pub fn register<S>(name: S, bits: usize) -> Register
where
    S: Into<String>,
{
    Register::new(name, bits)
}

/// A convenience function to create a new temporary.
///
/// This is the preferred way to create a `Temp` outside of a `Block`.
pub fn temp<S>(name: S, bits: usize) -> Temp
where
    S: Into<String>,
{
    Temp::new(name, bits)
}

/// A convenience function to create a new constant.
///
/// This is the preferred way to create a `Constant`.
pub fn const_(value: u64, bits: usize) -> Constant {
    Constant::new(value, bits)
}
