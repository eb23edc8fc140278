use std::fmt;

use crate::error::{CoreError, Result};

use super::CapacityPolicy;

/// Upper bound on slots reserved up front, whatever the history depth.
pub const PREALLOCATE_MAX: usize = 1024;

/// Storage policy injected into a buffer at construction.
///
/// `admit` is asked before every insertion that grows the queue; refusing it
/// surfaces as `ResourceExhaustion` to the producer.
pub trait AllocationStrategy: Send + Sync + fmt::Debug {
    /// Slots to reserve when the buffer is created.
    fn preallocate(&self, policy: CapacityPolicy) -> usize;

    /// May the queue grow from `occupied` to `occupied + 1` slots?
    fn admit(&self, occupied: usize) -> Result<()>;

    /// Hard ceiling on slots, if the strategy has one. A keep-last buffer evicts at
    /// `min(depth, limit)` so a small pool never turns into producer failures.
    fn slot_limit(&self) -> Option<usize> {
        None
    }
}

/// Global heap. Growth failures are still reported through `try_reserve`.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeapAllocation;

impl AllocationStrategy for HeapAllocation {
    fn preallocate(&self, policy: CapacityPolicy) -> usize {
        policy.capacity().map_or(0, |depth| depth.min(PREALLOCATE_MAX))
    }

    fn admit(&self, _occupied: usize) -> Result<()> {
        Ok(())
    }
}

/// Fixed pool of slots, reserved once.
#[derive(Debug, Clone, Copy)]
pub struct SlotPool {
    max_slots: usize,
}

impl SlotPool {
    pub const fn new(max_slots: usize) -> Self {
        Self { max_slots }
    }

    pub const fn max_slots(&self) -> usize {
        self.max_slots
    }
}

impl AllocationStrategy for SlotPool {
    fn preallocate(&self, policy: CapacityPolicy) -> usize {
        policy
            .capacity()
            .map_or(self.max_slots, |depth| depth.min(self.max_slots))
            .min(PREALLOCATE_MAX)
    }

    fn admit(&self, occupied: usize) -> Result<()> {
        if occupied >= self.max_slots {
            return Err(CoreError::resource_exhausted(occupied, self.max_slots));
        }
        Ok(())
    }

    fn slot_limit(&self) -> Option<usize> {
        Some(self.max_slots)
    }
}
