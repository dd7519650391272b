use serde::{Deserialize, Serialize};
use std::fmt;

/// A temporary in lifted code.
///
/// Temporaries carry values between instructions inside a function. Lifters
/// create them when decomposing a machine instruction into IL operations.
/// Register reads always go through an `Operation::Load` into a `Temp`;
/// there is no way to name a register's contents directly in an operand.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Temp {
    name: String,
    bits: usize,
}

impl Temp {
    pub fn new<S>(name: S, bits: usize) -> Temp
    where
        S: Into<String>,
    {
        Temp {
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

impl fmt::Display for Temp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.bits)
    }
}

/// A constant value.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Constant {
    value: u64,
    bits: usize,
}

impl Constant {
    pub fn new(value: u64, bits: usize) -> Constant {
        Constant { value, bits }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn bits(&self) -> usize {
        self.bits
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{:X}:{}", self.value, self.bits)
    }
}

/// An operand to an operation.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Value {
    Temp(Temp),
    Constant(Constant),
}

impl Value {
    /// Get the `Temp` held in this value, if there is one.
    pub fn temp(&self) -> Option<&Temp> {
        match self {
            Value::Temp(temp) => Some(temp),
            Value::Constant(_) => None,
        }
    }

    /// Get the `Constant` held in this value, if there is one.
    pub fn constant(&self) -> Option<&Constant> {
        match self {
            Value::Constant(constant) => Some(constant),
            Value::Temp(_) => None,
        }
    }

    pub fn bits(&self) -> usize {
        match self {
            Value::Temp(temp) => temp.bits(),
            Value::Constant(constant) => constant.bits(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Temp(temp) => temp.fmt(f),
            Value::Constant(constant) => constant.fmt(f),
        }
    }
}

impl From<Temp> for Value {
    fn from(temp: Temp) -> Value {
        Value::Temp(temp)
    }
}

impl From<Constant> for Value {
    fn from(constant: Constant) -> Value {
        Value::Constant(constant)
    }
}
