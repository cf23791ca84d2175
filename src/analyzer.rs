//! Per-block analysis driver
//!
//! Runs the passes strictly in sequence: dependency graph construction,
//! WCET sum, ASAP, ALAP (bounded by the ASAP completion time), then list
//! scheduling under the resource constraint. Every map and the resource
//! pool are created fresh per block; nothing is shared across blocks.

use crate::block::{Block, InstrId};
use crate::depgraph::DependencyGraph;
use crate::error::Result;
use crate::latency::estimate_wcet;
use crate::list_schedule::schedule_list;
use crate::report::{InstrSchedule, ScheduleReport};
use crate::resources::ResourcePool;
use crate::schedule::{schedule_alap, schedule_asap, CycleMap};
use serde::Serialize;
use tracing::debug;

/// Default number of interchangeable execution resources
pub const DEFAULT_RESOURCES: u32 = 10;

/// ILP estimator, configured once and reusable across blocks
#[derive(Debug, Clone)]
pub struct IlpEstimator {
    resources: u32,
}

impl IlpEstimator {
    /// Create an estimator with the given resource capacity
    ///
    /// Zero capacity is a configuration error, rejected before any
    /// scheduling takes place.
    pub fn new(resources: u32) -> Result<Self> {
        // ResourcePool owns the capacity check
        ResourcePool::new(resources)?;
        Ok(Self { resources })
    }

    /// Configured resource capacity
    pub fn resources(&self) -> u32 {
        self.resources
    }

    /// Analyze one block
    pub fn analyze(&self, block: &Block) -> Result<BlockAnalysis> {
        let graph = DependencyGraph::build(block)?;
        let wcet = estimate_wcet(block);
        let (asap, max_latency) = schedule_asap(block, &graph);
        let alap = schedule_alap(block, &graph, max_latency);
        let mut pool = ResourcePool::new(self.resources)?;
        let issue = schedule_list(block, &asap, &alap, &mut pool)?;

        let mut rows = Vec::new();
        for instr in block.instructions() {
            if instr.opcode.is_merge() {
                continue;
            }
            let instr_asap = asap.get(instr.id)?;
            let instr_alap = alap.get(instr.id)?;
            rows.push(InstrSchedule {
                id: instr.id,
                text: instr.to_string(),
                asap: instr_asap,
                alap: instr_alap,
                slack: instr_alap - instr_asap,
                issue: issue.get(instr.id)?,
            });
        }

        debug!(
            block = block.name(),
            wcet, max_latency, "block analysis complete"
        );

        Ok(BlockAnalysis {
            block: block.name().to_string(),
            wcet,
            max_latency,
            asap,
            alap,
            issue,
            rows,
        })
    }
}

impl Default for IlpEstimator {
    fn default() -> Self {
        Self {
            resources: DEFAULT_RESOURCES,
        }
    }
}

/// Results of analyzing one block
#[derive(Debug, Clone, Serialize)]
pub struct BlockAnalysis {
    block: String,
    wcet: u32,
    max_latency: u32,
    asap: CycleMap,
    alap: CycleMap,
    issue: CycleMap,
    rows: Vec<InstrSchedule>,
}

impl BlockAnalysis {
    /// Name of the analyzed block
    pub fn block(&self) -> &str {
        &self.block
    }

    /// WCET bound in cycles (sum of all latencies in program order)
    pub fn wcet(&self) -> u32 {
        self.wcet
    }

    /// Critical-path length in cycles
    pub fn max_latency(&self) -> u32 {
        self.max_latency
    }

    /// Earliest start cycle of an instruction
    pub fn asap(&self, id: InstrId) -> Result<u32> {
        self.asap.get(id)
    }

    /// Latest start cycle of an instruction
    pub fn alap(&self, id: InstrId) -> Result<u32> {
        self.alap.get(id)
    }

    /// ALAP - ASAP; zero marks a critical-path instruction
    pub fn slack(&self, id: InstrId) -> Result<u32> {
        Ok(self.alap.get(id)? - self.asap.get(id)?)
    }

    /// Cycle the list scheduler bound an instruction to
    pub fn issue_cycle(&self, id: InstrId) -> Result<u32> {
        self.issue.get(id)
    }

    /// Per-instruction schedules, in program order, merges excluded
    pub fn rows(&self) -> &[InstrSchedule] {
        &self.rows
    }

    /// Build the human-readable report
    pub fn report(&self) -> ScheduleReport {
        ScheduleReport {
            block: self.block.clone(),
            rows: self.rows.clone(),
            max_latency: self.max_latency,
            wcet: self.wcet,
        }
    }
}
