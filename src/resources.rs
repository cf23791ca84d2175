//! Execution resource pool
//!
//! Models N interchangeable functional units. Any instruction may occupy
//! any unit, one unit per instruction per issue cycle. The pool is reset at
//! the start of every cycle by the list scheduler and never shared across
//! blocks.

use crate::error::{Result, ScheduleError};

/// Pool of interchangeable execution units
#[derive(Debug, Clone)]
pub struct ResourcePool {
    capacity: u32,
    used: u32,
}

impl ResourcePool {
    /// Create a pool with `capacity` units; zero capacity is rejected
    pub fn new(capacity: u32) -> Result<Self> {
        if capacity == 0 {
            return Err(ScheduleError::InvalidCapacity);
        }
        Ok(Self { capacity, used: 0 })
    }

    /// Total number of units
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Units occupied in the current cycle
    pub fn used(&self) -> u32 {
        self.used
    }

    /// Release all units for a new cycle
    pub fn reset(&mut self) {
        self.used = 0;
    }

    /// True while at least one unit is free
    pub fn available(&self) -> bool {
        self.used < self.capacity
    }

    /// Occupy one unit for the current cycle
    pub fn bind(&mut self) {
        debug_assert!(self.available());
        self.used += 1;
    }
}
