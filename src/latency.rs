//! Fixed latency classes
//!
//! Two classes only: memory loads and multiplies take two cycles, everything
//! else one. The WCET bound is the plain sum of latencies in program order,
//! a trivial upper bound distinct from the critical-path length.

use crate::block::{Block, Instruction, Opcode};

/// Cycle latency of an instruction
///
/// `None` stands for "no producer" and costs zero cycles. The merge
/// pseudo-instruction reports one cycle but is never actually scheduled.
pub fn latency(instr: Option<&Instruction>) -> u32 {
    match instr {
        None => 0,
        Some(i) => match i.opcode {
            Opcode::Load | Opcode::Mul => 2,
            _ => 1,
        },
    }
}

/// Worst-case execution time bound: sum of all latencies in program order
pub fn estimate_wcet(block: &Block) -> u32 {
    block
        .instructions()
        .iter()
        .map(|i| latency(Some(i)))
        .sum()
}
