//! Dataflow analyses over merlin IL.

pub mod abi;
pub mod fixed_point;
pub mod lattice;

pub use self::fixed_point::{fixed_point, BlockStates, Direction, FixedPointAnalysis};
pub use self::lattice::{Lattice, RegisterState};
