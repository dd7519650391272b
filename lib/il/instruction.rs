use crate::il::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An `Instruction` gives location to an `Operation` within a `Block`.
///
/// Instructions are created implicitly through the builder methods on
/// `Block`, which hand out block-unique indices. The optional `address` is
/// filled in by a lifter with the address of the machine instruction this IL
/// instruction was lifted from.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Instruction {
    operation: Operation,
    index: u64,
    address: Option<u64>,
}

impl Instruction {
    pub(crate) fn new(index: u64, operation: Operation) -> Instruction {
        Instruction {
            operation,
            index,
            address: None,
        }
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    pub fn operation_mut(&mut self) -> &mut Operation {
        &mut self.operation
    }

    /// The block-unique index of this instruction.
    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn address(&self) -> Option<u64> {
        self.address
    }

    pub fn set_address(&mut self, address: Option<u64>) {
        self.address = address;
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.address {
            Some(address) => write!(f, "{:X} {:02X} {}", address, self.index, self.operation),
            None => write!(f, "{:02X} {}", self.index, self.operation),
        }
    }
}
