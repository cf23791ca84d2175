//! Dependency graph construction
//!
//! Builds the "users" relation for one block: for each instruction, the
//! in-block consumers that are real computation (merge pseudo-instructions
//! excluded). The adjacency is built once per block and shared by both
//! longest-path passes.
//!
//! Construction also validates block structure. Operands must name earlier
//! instructions of the same block (def-before-use rules out dependency
//! cycles), and merge pseudo-instructions may only form a prefix of the
//! block. A violation abandons the block's analysis instead of producing an
//! inconsistent schedule.

use crate::block::{Block, InstrId};
use crate::error::{Result, ScheduleError};

/// Consumer adjacency for one block
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    users: Vec<Vec<InstrId>>,
}

impl DependencyGraph {
    /// Build the users relation, validating block structure on the way
    pub fn build(block: &Block) -> Result<Self> {
        let len = block.len();
        let mut users: Vec<Vec<InstrId>> = vec![Vec::new(); len];
        let mut seen_computation = false;

        for instr in block.instructions() {
            if instr.opcode.is_merge() {
                if seen_computation {
                    return Err(ScheduleError::MisplacedMerge { instr: instr.id });
                }
            } else {
                seen_computation = true;
            }

            for &operand in &instr.operands {
                if operand.index() >= len {
                    return Err(ScheduleError::UndefinedOperand {
                        user: instr.id,
                        operand,
                    });
                }
                if operand.index() >= instr.id.index() {
                    return Err(ScheduleError::UseBeforeDef {
                        user: instr.id,
                        operand,
                    });
                }
                // repeated operands must not register the consumer twice
                let consumers = &mut users[operand.index()];
                if !instr.opcode.is_merge() && consumers.last() != Some(&instr.id) {
                    consumers.push(instr.id);
                }
            }
        }

        Ok(Self { users })
    }

    /// Non-merge in-block consumers of `id`, in program order
    pub fn users(&self, id: InstrId) -> &[InstrId] {
        &self.users[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Opcode;

    #[test]
    fn test_users_in_program_order() {
        let mut block = Block::new("entry");
        let a = block.push(Opcode::Load, vec![]);
        let b = block.push(Opcode::Mul, vec![a, a]);
        let c = block.push(Opcode::Add, vec![a, b]);
        let graph = DependencyGraph::build(&block).unwrap();
        assert_eq!(graph.users(a), &[b, c]);
        assert_eq!(graph.users(b), &[c]);
        assert_eq!(graph.users(c), &[] as &[InstrId]);
    }

    #[test]
    fn test_merge_consumers_excluded() {
        let mut block = Block::new("entry");
        let p = block.push(Opcode::Phi, vec![]);
        let q = block.push(Opcode::Phi, vec![p]);
        let a = block.push(Opcode::Add, vec![p]);
        let graph = DependencyGraph::build(&block).unwrap();
        // q uses p but is a merge, so only the add counts
        assert_eq!(graph.users(p), &[a]);
        assert_eq!(graph.users(q), &[] as &[InstrId]);
    }

    #[test]
    fn test_out_of_block_operand_rejected() {
        let mut block = Block::new("entry");
        let a = block.push(Opcode::Load, vec![]);
        block.push(Opcode::Add, vec![a, InstrId(7)]);
        let err = DependencyGraph::build(&block).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::UndefinedOperand {
                user: InstrId(1),
                operand: InstrId(7),
            }
        );
    }

    #[test]
    fn test_use_before_def_rejected() {
        let mut block = Block::new("entry");
        block.push(Opcode::Add, vec![InstrId(1)]);
        block.push(Opcode::Load, vec![]);
        let err = DependencyGraph::build(&block).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::UseBeforeDef {
                user: InstrId(0),
                operand: InstrId(1),
            }
        );
    }

    #[test]
    fn test_self_dependency_rejected() {
        let mut block = Block::new("entry");
        block.push(Opcode::Add, vec![InstrId(0)]);
        let err = DependencyGraph::build(&block).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::UseBeforeDef {
                user: InstrId(0),
                operand: InstrId(0),
            }
        );
    }

    #[test]
    fn test_misplaced_merge_rejected() {
        let mut block = Block::new("entry");
        block.push(Opcode::Load, vec![]);
        block.push(Opcode::Phi, vec![]);
        let err = DependencyGraph::build(&block).unwrap_err();
        assert_eq!(err, ScheduleError::MisplacedMerge { instr: InstrId(1) });
    }
}
