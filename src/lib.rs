//! ILP estimation for straight-line basic blocks
//!
//! This crate computes, for a single basic block:
//! - A worst-case execution time bound (sum of instruction latencies)
//! - ASAP and ALAP schedules via dual longest-path passes
//! - Per-instruction slack (critical-path detection)
//! - A resource-constrained issue schedule via priority list scheduling
//!
//! The host invokes [`IlpEstimator::analyze`] once per block; all maps and
//! the resource pool are freshly created per block and carry no state
//! across blocks.

pub mod analyzer;
pub mod block;
pub mod depgraph;
pub mod error;
pub mod latency;
pub mod list_schedule;
pub mod parse;
pub mod report;
pub mod resources;
pub mod schedule;

// Re-export main types
pub use analyzer::{BlockAnalysis, IlpEstimator, DEFAULT_RESOURCES};
pub use block::{Block, InstrId, Instruction, Opcode};
pub use depgraph::DependencyGraph;
pub use error::{Result, ScheduleError};
pub use latency::{estimate_wcet, latency};
pub use list_schedule::schedule_list;
pub use parse::parse_block;
pub use report::{InstrSchedule, ScheduleReport};
pub use resources::ResourcePool;
pub use schedule::{schedule_alap, schedule_asap, CycleMap};
