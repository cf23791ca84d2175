//! ASAP and ALAP scheduling passes
//!
//! Two dual longest-path traversals over the dependency graph:
//! - ASAP walks forward in program order and relaxes each consumer's
//!   earliest start, producing the block's minimum completion time.
//! - ALAP walks backward, bounded by that completion time, and produces the
//!   latest start that does not delay the block.
//!
//! Program order visits producers before consumers, so a single traversal
//! per direction is enough for this acyclic, single-block model.

use crate::block::{Block, InstrId};
use crate::depgraph::DependencyGraph;
use crate::error::{Result, ScheduleError};
use crate::latency::latency;
use serde::Serialize;

/// Dense per-instruction cycle assignment
///
/// Indexed by `InstrId`. Entries left unset (merge pseudo-instructions in
/// an ALAP map, unbound instructions mid-pass) surface as `Unscheduled`
/// errors when queried, never as a silent zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleMap {
    cycles: Vec<Option<u32>>,
}

impl CycleMap {
    /// Create a map with every entry unset
    pub fn new(len: usize) -> Self {
        Self {
            cycles: vec![None; len],
        }
    }

    /// Assign a cycle to an instruction
    pub fn set(&mut self, id: InstrId, cycle: u32) {
        self.cycles[id.index()] = Some(cycle);
    }

    /// Cycle of `id`, or `Unscheduled` if it never received one
    pub fn get(&self, id: InstrId) -> Result<u32> {
        self.cycles
            .get(id.index())
            .copied()
            .flatten()
            .ok_or(ScheduleError::Unscheduled(id))
    }

    /// Cycle of `id` if it has one
    pub fn try_get(&self, id: InstrId) -> Option<u32> {
        self.cycles.get(id.index()).copied().flatten()
    }

    /// True once `id` has a cycle
    pub fn contains(&self, id: InstrId) -> bool {
        self.try_get(id).is_some()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    /// True if the map has no entries
    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }
}

/// Forward longest-path pass
///
/// Returns the ASAP map and the block's minimum completion time assuming
/// unlimited resources. Instructions with no producers start at cycle 0.
pub fn schedule_asap(block: &Block, graph: &DependencyGraph) -> (CycleMap, u32) {
    let mut asap = CycleMap::new(block.len());
    let mut max_latency = 0;

    for instr in block.instructions() {
        let start = asap.try_get(instr.id).unwrap_or(0);
        asap.set(instr.id, start);
        let finish = start + latency(Some(instr));

        for &user in graph.users(instr.id) {
            let current = asap.try_get(user).unwrap_or(0);
            if finish > current {
                asap.set(user, finish);
            }
        }

        if finish > max_latency {
            max_latency = finish;
        }
    }

    (asap, max_latency)
}

/// Backward longest-path pass, bounded by the ASAP completion time
///
/// Merge pseudo-instructions are skipped and receive no entry. An
/// instruction whose consumers all lie off the critical chain is bounded by
/// the block horizon, not by zero.
pub fn schedule_alap(block: &Block, graph: &DependencyGraph, max_latency: u32) -> CycleMap {
    let mut alap = CycleMap::new(block.len());

    for instr in block.instructions().iter().rev() {
        if instr.opcode.is_merge() {
            continue;
        }

        let mut earliest_user = max_latency;
        for &user in graph.users(instr.id) {
            // consumers without an ALAP yet fall back to the horizon
            if let Some(cycle) = alap.try_get(user) {
                earliest_user = earliest_user.min(cycle);
            }
        }

        alap.set(instr.id, earliest_user - latency(Some(instr)));
    }

    alap
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Opcode;

    fn passes(block: &Block) -> (CycleMap, CycleMap, u32) {
        let graph = DependencyGraph::build(block).unwrap();
        let (asap, max_latency) = schedule_asap(block, &graph);
        let alap = schedule_alap(block, &graph, max_latency);
        (asap, alap, max_latency)
    }

    #[test]
    fn test_dependency_chain() {
        // load -> mul -> add, all on the critical path
        let mut block = Block::new("entry");
        let a = block.push(Opcode::Load, vec![]);
        let b = block.push(Opcode::Mul, vec![a, a]);
        let c = block.push(Opcode::Add, vec![b]);
        let (asap, alap, max_latency) = passes(&block);

        assert_eq!(asap.get(a).unwrap(), 0);
        assert_eq!(asap.get(b).unwrap(), 2);
        assert_eq!(asap.get(c).unwrap(), 4);
        assert_eq!(alap.get(a).unwrap(), 0);
        assert_eq!(alap.get(b).unwrap(), 2);
        assert_eq!(alap.get(c).unwrap(), 4);
        assert_eq!(max_latency, 5);
    }

    #[test]
    fn test_independent_producers_share_consumer() {
        let mut block = Block::new("entry");
        let a = block.push(Opcode::Add, vec![]);
        let b = block.push(Opcode::Sub, vec![]);
        let c = block.push(Opcode::Add, vec![a, b]);
        let (asap, alap, max_latency) = passes(&block);

        assert_eq!(asap.get(a).unwrap(), 0);
        assert_eq!(asap.get(b).unwrap(), 0);
        assert_eq!(asap.get(c).unwrap(), 1);
        assert_eq!(max_latency, 2);
        // both producers feed the same bound, so neither has slack
        assert_eq!(alap.get(a).unwrap(), 0);
        assert_eq!(alap.get(b).unwrap(), 0);
    }

    #[test]
    fn test_off_critical_instruction_gets_horizon_slack() {
        // chain load->mul->add fixes the horizon at 5; a lone store can
        // drift anywhere up to cycle 4
        let mut block = Block::new("entry");
        let a = block.push(Opcode::Load, vec![]);
        let b = block.push(Opcode::Mul, vec![a, a]);
        block.push(Opcode::Add, vec![b]);
        let d = block.push(Opcode::Store, vec![]);
        let (asap, alap, max_latency) = passes(&block);

        assert_eq!(max_latency, 5);
        assert_eq!(asap.get(d).unwrap(), 0);
        assert_eq!(alap.get(d).unwrap(), 4);
    }

    #[test]
    fn test_merges_have_no_alap_entry() {
        let mut block = Block::new("entry");
        let p = block.push(Opcode::Phi, vec![]);
        let a = block.push(Opcode::Add, vec![]);
        let (asap, alap, _) = passes(&block);

        assert_eq!(asap.get(p).unwrap(), 0);
        assert_eq!(alap.get(p), Err(ScheduleError::Unscheduled(p)));
        assert!(alap.contains(a));
    }

    #[test]
    fn test_alap_never_below_asap() {
        let mut block = Block::new("entry");
        let a = block.push(Opcode::Load, vec![]);
        let b = block.push(Opcode::Load, vec![]);
        let c = block.push(Opcode::Mul, vec![a, b]);
        let d = block.push(Opcode::Add, vec![a]);
        let e = block.push(Opcode::Store, vec![c, d]);
        let (asap, alap, _) = passes(&block);

        for id in [a, b, c, d, e] {
            assert!(alap.get(id).unwrap() >= asap.get(id).unwrap());
        }
    }

    #[test]
    fn test_edge_consistency() {
        let mut block = Block::new("entry");
        let a = block.push(Opcode::Load, vec![]);
        let b = block.push(Opcode::Mul, vec![a, a]);
        let c = block.push(Opcode::Add, vec![a, b]);
        let graph = DependencyGraph::build(&block).unwrap();
        let (asap, max_latency) = schedule_asap(&block, &graph);
        let alap = schedule_alap(&block, &graph, max_latency);

        for instr in block.instructions() {
            let producer_latency = latency(Some(instr));
            for &user in graph.users(instr.id) {
                assert!(
                    asap.get(user).unwrap() >= asap.get(instr.id).unwrap() + producer_latency
                );
                assert!(
                    alap.get(instr.id).unwrap() <= alap.get(user).unwrap() - producer_latency
                );
            }
        }
    }

    #[test]
    fn test_lookup_miss_surfaces() {
        let map = CycleMap::new(3);
        assert_eq!(map.get(InstrId(1)), Err(ScheduleError::Unscheduled(InstrId(1))));
        assert_eq!(map.get(InstrId(9)), Err(ScheduleError::Unscheduled(InstrId(9))));
    }
}
