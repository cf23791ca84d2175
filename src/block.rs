//! Straight-line basic blocks
//!
//! A block is an ordered arena of instructions. Instructions refer to their
//! producers by `InstrId`, a stable index into the owning block, so every
//! schedule can be a dense array instead of an associative map.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Instruction identifier: a stable index into its block's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstrId(pub u32);

impl InstrId {
    /// Arena index of this instruction
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for InstrId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// Opcode classes
///
/// Only the latency class matters to the estimator: loads and multiplies
/// take two cycles, everything else one. `Phi` is the control-flow-merge
/// pseudo-instruction; it may only appear at the start of a block and is
/// never scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Opcode {
    Phi,
    Load,
    Store,
    Add,
    Sub,
    Mul,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    ICmp,
    Select,
}

impl Opcode {
    /// True for control-flow-merge pseudo-instructions
    pub fn is_merge(self) -> bool {
        matches!(self, Opcode::Phi)
    }

    /// Assembly-style mnemonic
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Phi => "phi",
            Opcode::Load => "load",
            Opcode::Store => "store",
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Mul => "mul",
            Opcode::And => "and",
            Opcode::Or => "or",
            Opcode::Xor => "xor",
            Opcode::Shl => "shl",
            Opcode::Shr => "shr",
            Opcode::ICmp => "icmp",
            Opcode::Select => "select",
        }
    }

    /// Look up an opcode by its mnemonic
    pub fn from_mnemonic(s: &str) -> Option<Self> {
        match s {
            "phi" => Some(Opcode::Phi),
            "load" => Some(Opcode::Load),
            "store" => Some(Opcode::Store),
            "add" => Some(Opcode::Add),
            "sub" => Some(Opcode::Sub),
            "mul" => Some(Opcode::Mul),
            "and" => Some(Opcode::And),
            "or" => Some(Opcode::Or),
            "xor" => Some(Opcode::Xor),
            "shl" => Some(Opcode::Shl),
            "shr" => Some(Opcode::Shr),
            "icmp" => Some(Opcode::ICmp),
            "select" => Some(Opcode::Select),
            _ => None,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// A single instruction inside a block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instruction {
    /// Position of this instruction in its block
    pub id: InstrId,
    /// Opcode class
    pub opcode: Opcode,
    /// In-block producers this instruction reads from
    pub operands: Vec<InstrId>,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.id, self.opcode)?;
        for op in &self.operands {
            write!(f, " {}", op)?;
        }
        Ok(())
    }
}

/// An ordered, finite sequence of instructions with no internal branches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    name: String,
    instructions: Vec<Instruction>,
}

impl Block {
    /// Create an empty block
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: Vec::new(),
        }
    }

    /// Block name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append an instruction and return its id
    pub fn push(&mut self, opcode: Opcode, operands: Vec<InstrId>) -> InstrId {
        let id = InstrId(self.instructions.len() as u32);
        self.instructions.push(Instruction {
            id,
            opcode,
            operands,
        });
        id
    }

    /// Number of instructions, merge pseudo-instructions included
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// True if the block holds no instructions
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Look up an instruction by id
    pub fn get(&self, id: InstrId) -> Option<&Instruction> {
        self.instructions.get(id.index())
    }

    /// Instructions in program order
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }
}
