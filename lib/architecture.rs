//! Register catalogs for merlin's supported architectures.

use crate::il;
use std::fmt::Debug;

/// Necessary functions for analysis over architectures.
///
/// The ABI analyses only need to know which storage locations model the
/// architecture's registers. The catalog returned by `abi_registers` is the
/// complete set of registers those analyses track; the order is stable and is
/// the order in which per-register results are reported.
pub trait Architecture: Debug + Send + Sync {
    /// The name of this architecture.
    fn name(&self) -> &str;
    /// Get the size of a natural word for this architecture in bits.
    fn word_size(&self) -> usize;
    /// Get the registers participating in this architecture's calling
    /// conventions, in a stable order.
    fn abi_registers(&self) -> Vec<il::Register>;
}

/// The 64-bit X86 Architecture.
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct Amd64 {}

impl Amd64 {
    pub fn new() -> Amd64 {
        Amd64 {}
    }
}

impl Architecture for Amd64 {
    fn name(&self) -> &str {
        "amd64"
    }
    fn word_size(&self) -> usize {
        64
    }
    fn abi_registers(&self) -> Vec<il::Register> {
        ["rax", "rbx", "rcx", "rdx", "rsi", "rdi", "rsp", "rbp", "r8", "r9", "r10", "r11",
            "r12", "r13", "r14", "r15"]
            .iter()
            .map(|name| il::register(*name, 64))
            .collect()
    }
}

/// The 32-bit Mips Architecture.
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct Mips {}

impl Mips {
    pub fn new() -> Mips {
        Mips {}
    }
}

impl Architecture for Mips {
    fn name(&self) -> &str {
        "mips"
    }
    fn word_size(&self) -> usize {
        32
    }
    fn abi_registers(&self) -> Vec<il::Register> {
        ["$at", "$v0", "$v1", "$a0", "$a1", "$a2", "$a3", "$t0", "$t1", "$t2", "$t3", "$t4",
            "$t5", "$t6", "$t7", "$s0", "$s1", "$s2", "$s3", "$s4", "$s5", "$s6", "$s7", "$t8",
            "$t9", "$gp", "$sp", "$fp", "$ra"]
            .iter()
            .map(|name| il::register(*name, 32))
            .collect()
    }
}
