//! Lattice abstractions for merlin's dataflow analyses.
//!
//! A dataflow analysis in this crate is built from a small per-register
//! [`Lattice`] lifted pointwise over the register set by [`RegisterState`].
//! The lifting is generic, so analyses which track different per-register
//! domains share the same map machinery.

use crate::il;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Debug;

/// A join-semilattice of abstract values.
///
/// `combine` is the join used to merge abstract states flowing in from
/// multiple predecessors. It is deliberately *not* required to be
/// commutative: several of merlin's lattices break ties in favor of the
/// left-hand operand, and downstream consumers depend on that bias.
/// Convergence of the fixed-point solver only requires that `combine` be an
/// upper bound of both operands under `is_less_or_equal`.
pub trait Lattice: Clone + Debug + Eq {
    /// The element every unconstrained point holds.
    fn default_value() -> Self;

    /// True if `self` is ordered at-or-below `other`.
    fn is_less_or_equal(&self, other: &Self) -> bool;

    /// Join `other` into `self`, favoring `self` on unordered pairs.
    fn combine(&self, other: &Self) -> Self;
}

/// A mapping from registers to elements of a `Lattice`, itself a `Lattice`.
///
/// Registers absent from the map implicitly hold `V::default_value()`, so a
/// lookup never fails and the order and join are defined over the union of
/// both operands' keys. The map is a value type: block transfer functions
/// clone it and return a new map, leaving states already recorded by the
/// solver untouched.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct RegisterState<V: Lattice> {
    registers: BTreeMap<il::Register, V>,
}

impl<V: Lattice> RegisterState<V> {
    /// Creates an empty state where every register holds the default value.
    pub fn new() -> RegisterState<V> {
        RegisterState {
            registers: BTreeMap::new(),
        }
    }

    /// The value held by the given register.
    pub fn value(&self, register: &il::Register) -> V {
        self.registers
            .get(register)
            .cloned()
            .unwrap_or_else(V::default_value)
    }

    /// Sets the value held by the given register.
    pub fn set(&mut self, register: il::Register, value: V) {
        self.registers.insert(register, value);
    }

    /// The registers with explicit entries in this state.
    pub fn registers(&self) -> impl Iterator<Item = &il::Register> {
        self.registers.keys()
    }

    /// True if this state holds no explicit entries.
    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.registers.len()
    }
}

impl<V: Lattice> Default for RegisterState<V> {
    fn default() -> RegisterState<V> {
        RegisterState::new()
    }
}

impl<V: Lattice> Lattice for RegisterState<V> {
    fn default_value() -> RegisterState<V> {
        RegisterState::new()
    }

    fn is_less_or_equal(&self, other: &RegisterState<V>) -> bool {
        self.registers
            .keys()
            .chain(other.registers.keys())
            .all(|register| self.value(register).is_less_or_equal(&other.value(register)))
    }

    fn combine(&self, other: &RegisterState<V>) -> RegisterState<V> {
        let mut combined = self.clone();
        for (register, value) in &other.registers {
            let joined = combined.value(register).combine(value);
            combined.registers.insert(register.clone(), joined);
        }
        combined
    }
}

impl<V: Lattice + fmt::Display> fmt::Display for RegisterState<V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        let mut is_first = true;
        for (register, value) in &self.registers {
            if !is_first {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", register, value)?;
            is_first = false;
        }
        write!(f, "}}")
    }
}
