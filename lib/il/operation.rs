use crate::il::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The target of a call operation.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum CallTarget {
    /// A call to a statically known procedure, by name.
    Direct(String),
    /// A call through a computed target.
    Indirect(Value),
}

impl CallTarget {
    /// The name of the called procedure, when it is statically known.
    pub fn name(&self) -> Option<&str> {
        match self {
            CallTarget::Direct(name) => Some(name),
            CallTarget::Indirect(_) => None,
        }
    }
}

impl fmt::Display for CallTarget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CallTarget::Direct(name) => write!(f, "{}", name),
            CallTarget::Indirect(value) => write!(f, "[{}]", value),
        }
    }
}

/// An IL Operation updates some state.
///
/// Every side effect a lifted machine instruction can have on the tracked
/// state is one of these closed variants. Analyses match on the variant
/// rather than inspecting opcodes.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Operation {
    /// Load the value held in a storage location into a temporary.
    Load { dst: Temp, src: Register },
    /// Store a value into a storage location.
    Store { dst: Register, src: Value },
    /// Call a procedure.
    Call { target: CallTarget },
    /// Branch to a computed target. Terminates a block.
    Branch { target: Value },
    /// No operation. Provides an instruction with a location when no state
    /// change takes place at that location.
    Nop,
}

impl Operation {
    pub fn load(dst: Temp, src: Register) -> Operation {
        Operation::Load { dst, src }
    }

    pub fn store(dst: Register, src: Value) -> Operation {
        Operation::Store { dst, src }
    }

    pub fn call(target: CallTarget) -> Operation {
        Operation::Call { target }
    }

    pub fn branch(target: Value) -> Operation {
        Operation::Branch { target }
    }

    pub fn nop() -> Operation {
        Operation::Nop
    }

    /// The storage location this operation writes, if any.
    pub fn register_written(&self) -> Option<&Register> {
        match self {
            Operation::Store { dst, .. } => Some(dst),
            _ => None,
        }
    }

    /// The storage location this operation reads, if any.
    pub fn register_read(&self) -> Option<&Register> {
        match self {
            Operation::Load { src, .. } => Some(src),
            _ => None,
        }
    }

    /// The call target, when this operation is a call.
    pub fn call_target(&self) -> Option<&CallTarget> {
        match self {
            Operation::Call { target } => Some(target),
            _ => None,
        }
    }

    pub fn is_load(&self) -> bool {
        matches!(self, Operation::Load { .. })
    }

    pub fn is_store(&self) -> bool {
        matches!(self, Operation::Store { .. })
    }

    pub fn is_call(&self) -> bool {
        matches!(self, Operation::Call { .. })
    }

    pub fn is_branch(&self) -> bool {
        matches!(self, Operation::Branch { .. })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operation::Load { dst, src } => write!(f, "{} = {}", dst, src),
            Operation::Store { dst, src } => write!(f, "{} = {}", dst, src),
            Operation::Call { target } => write!(f, "call {}", target),
            Operation::Branch { target } => write!(f, "branch {}", target),
            Operation::Nop => write!(f, "nop"),
        }
    }
}
