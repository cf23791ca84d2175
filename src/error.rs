//! Error types for block analysis

use crate::block::InstrId;
use thiserror::Error;

/// Result type for scheduling operations
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Errors that can occur while analyzing a block
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScheduleError {
    /// Resource capacity of 0 supplied - nothing could ever be scheduled
    #[error("invalid resource capacity 0: at least one execution unit is required")]
    InvalidCapacity,

    /// An operand refers to an instruction outside this block
    #[error("instruction {user} references {operand}, which is not defined in this block")]
    UndefinedOperand { user: InstrId, operand: InstrId },

    /// An operand is defined at or after its user (would imply a dependency cycle)
    #[error("instruction {user} uses {operand} before it is defined")]
    UseBeforeDef { user: InstrId, operand: InstrId },

    /// A merge pseudo-instruction appears after real computation has started
    #[error("merge pseudo-instruction {instr} appears after non-merge instructions")]
    MisplacedMerge { instr: InstrId },

    /// A schedule was queried for an instruction it never assigned a cycle
    #[error("instruction {0} was never scheduled")]
    Unscheduled(InstrId),

    /// Textual block format error
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}
