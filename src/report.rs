//! Human-readable schedule report

use crate::block::InstrId;
use serde::Serialize;
use std::fmt;

/// Scheduling results for one non-merge instruction
#[derive(Debug, Clone, Serialize)]
pub struct InstrSchedule {
    /// Instruction id
    pub id: InstrId,
    /// Rendered instruction, e.g. `%2 = mul %0 %1`
    pub text: String,
    /// Earliest start cycle
    pub asap: u32,
    /// Latest start cycle without delaying the block
    pub alap: u32,
    /// ALAP - ASAP; zero marks a critical-path instruction
    pub slack: u32,
    /// Cycle assigned by the resource-constrained list scheduler
    pub issue: u32,
}

/// Schedule report for one block
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleReport {
    /// Block name
    pub block: String,
    /// Per-instruction schedules, in program order, merges excluded
    pub rows: Vec<InstrSchedule>,
    /// Critical-path length (minimum cycles with unlimited resources)
    pub max_latency: u32,
    /// Worst-case execution time bound (sum of all latencies)
    pub wcet: u32,
}

impl ScheduleReport {
    /// Print the report to stdout
    pub fn print(&self) {
        println!("{}", self);
    }
}

impl fmt::Display for ScheduleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Schedule Report: {} ===", self.block)?;
        for row in &self.rows {
            writeln!(f, "{}", row.text)?;
            writeln!(
                f,
                "  ALAP: {}  ASAP: {}  Slack: {}  Issue: {}",
                row.alap, row.asap, row.slack, row.issue
            )?;
        }
        writeln!(f, "Maximum latency is: {}", self.max_latency)?;
        write!(f, "WCET estimate: {}", self.wcet)
    }
}
