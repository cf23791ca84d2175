//! Priority-driven list scheduling
//!
//! Greedy binding of ready instructions to issue cycles under the resource
//! constraint, run after the ASAP and ALAP passes. The priority of a ready
//! instruction is derived from its slack: zero-slack (critical-path)
//! instructions always outrank the rest, ties fall to program order.

use crate::block::{Block, Instruction};
use crate::error::{Result, ScheduleError};
use crate::latency::latency;
use crate::resources::ResourcePool;
use crate::schedule::CycleMap;
use tracing::trace;

/// Bind every non-merge instruction to an issue cycle
///
/// Per cycle: reset the pool, then repeatedly bind the highest-scoring
/// ready instruction until the pool is exhausted or nothing further is
/// ready, then advance. An instruction is ready once each of its non-merge
/// producers has been bound and has completed (`cycle + latency` reached).
/// Terminates because the graph is acyclic and every bound producer
/// completes a bounded number of cycles later.
pub fn schedule_list(
    block: &Block,
    asap: &CycleMap,
    alap: &CycleMap,
    pool: &mut ResourcePool,
) -> Result<CycleMap> {
    let mut issue = CycleMap::new(block.len());
    let total = block
        .instructions()
        .iter()
        .filter(|i| !i.opcode.is_merge())
        .count();

    // the priority base must exceed the largest slack in this block, so a
    // ready instruction always scores positive while a unit is free
    let mut score_base = 1;
    for instr in block.instructions() {
        if instr.opcode.is_merge() {
            continue;
        }
        let slack = alap.get(instr.id)? - asap.get(instr.id)?;
        if slack >= score_base {
            score_base = slack + 1;
        }
    }

    let mut bound = 0;
    let mut cycle = 0;
    pool.reset();

    while bound < total {
        loop {
            let mut best: Option<(&Instruction, u32)> = None;
            for instr in block.instructions() {
                if instr.opcode.is_merge() || issue.contains(instr.id) {
                    continue;
                }
                if !is_ready(block, &issue, instr, cycle)? {
                    continue;
                }
                let score = instruction_score(pool, asap, alap, instr, score_base)?;
                if score == 0 {
                    continue;
                }
                // strict comparison keeps the earliest instruction on ties
                if best.map_or(true, |(_, s)| score > s) {
                    best = Some((instr, score));
                }
            }

            let Some((instr, score)) = best else { break };
            pool.bind();
            issue.set(instr.id, cycle);
            bound += 1;
            trace!(instr = %instr.id, cycle, score, "bound instruction");
        }

        cycle += 1;
        pool.reset();
    }

    Ok(issue)
}

/// True once every non-merge producer of `instr` has completed by `cycle`
fn is_ready(block: &Block, issue: &CycleMap, instr: &Instruction, cycle: u32) -> Result<bool> {
    for &operand in &instr.operands {
        let producer = block
            .get(operand)
            .ok_or(ScheduleError::UndefinedOperand {
                user: instr.id,
                operand,
            })?;
        if producer.opcode.is_merge() {
            // merges are never bound; their values appear after the merge's
            // nominal latency, matching the ASAP relaxation
            if latency(Some(producer)) > cycle {
                return Ok(false);
            }
            continue;
        }
        match issue.try_get(operand) {
            Some(start) if start + latency(Some(producer)) <= cycle => {}
            _ => return Ok(false),
        }
    }
    Ok(true)
}

/// Slack-based priority; zero whenever the pool has no free unit
fn instruction_score(
    pool: &ResourcePool,
    asap: &CycleMap,
    alap: &CycleMap,
    instr: &Instruction,
    score_base: u32,
) -> Result<u32> {
    if !pool.available() {
        return Ok(0);
    }
    let slack = alap.get(instr.id)? - asap.get(instr.id)?;
    Ok(score_base - slack)
}
