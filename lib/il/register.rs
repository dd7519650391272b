use serde::{Deserialize, Serialize};
use std::fmt;

/// A named storage location in lifted code.
///
/// A `Register` names one architectural register's storage location, or any
/// other named location a lifter chooses to model the same way. Whether a
/// `Register` is an ABI register of interest is decided by the architecture's
/// catalog, not by the register itself. Two registers are the same location
/// iff they compare equal.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Register {
    name: String,
    bits: usize,
}

impl Register {
    pub fn new<S>(name: S, bits: usize) -> Register
    where
        S: Into<String>,
    {
        Register {
            name: name.into(),
            bits,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bits(&self) -> usize {
        self.bits
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.bits)
    }
}
