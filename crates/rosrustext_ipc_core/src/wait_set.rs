//! rosrustext_ipc_core::wait_set
//!
//! Minimal model of the event-waiting infrastructure endpoints register with.
//! The poll loop itself lives outside this crate; what lives here is the
//! registration table, the participant contract and the guard-condition signal.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{CoreError, Domain, ErrorKind, Payload, Result};

/// What kind of entity occupies a wait-set slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EntryKind {
    Subscription,
    Service,
    GuardCondition,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct WaitEntry {
    pub kind: EntryKind,
    pub name: String,
}

/// Fixed-capacity registration table rebuilt on every poll cycle.
#[derive(Debug)]
pub struct WaitSet {
    entries: Vec<WaitEntry>,
    capacity: usize,
}

impl WaitSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Register an entity for the current cycle; returns its slot index.
    pub fn add(&mut self, kind: EntryKind, name: impl Into<String>) -> Result<usize> {
        if self.entries.len() >= self.capacity {
            return Err(CoreError::error()
                .domain(Domain::WaitSet)
                .kind(ErrorKind::CapacityExceeded)
                .msg("wait set is full")
                .payload(Payload::Occupancy {
                    occupied: self.entries.len(),
                    limit: self.capacity,
                })
                .build());
        }

        self.entries.push(WaitEntry {
            kind,
            name: name.into(),
        });
        Ok(self.entries.len() - 1)
    }

    /// Drop all registrations (start of a new poll cycle).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn entries(&self) -> &[WaitEntry] {
        &self.entries
    }
}

/// Anything the poll loop can register and query.
///
/// `add_to_wait_set` returns `false` only when registration failed; an entity with
/// nothing to wait on reports `true`.
pub trait WaitSetParticipant: Send + Sync {
    fn add_to_wait_set(&self, wait_set: &mut WaitSet) -> bool;

    fn is_ready(&self, wait_set: &WaitSet) -> bool;
}

/// Lightweight signal used to wake a blocked poll.
pub trait GuardCondition: Send + Sync {
    fn trigger(&self);
}

/// Guard condition that only counts triggers. Useful for synchronous poll loops.
#[derive(Debug, Default)]
pub struct CountingGuardCondition {
    total: AtomicU64,
    pending: AtomicU64,
}

impl CountingGuardCondition {
    pub const fn new() -> Self {
        Self {
            total: AtomicU64::new(0),
            pending: AtomicU64::new(0),
        }
    }

    /// Triggers since construction.
    pub fn trigger_count(&self) -> u64 {
        self.total.load(Ordering::Acquire)
    }

    /// Triggers since the last call; resets the pending count.
    pub fn take_triggered(&self) -> u64 {
        self.pending.swap(0, Ordering::AcqRel)
    }
}

impl GuardCondition for CountingGuardCondition {
    fn trigger(&self) {
        self.total.fetch_add(1, Ordering::AcqRel);
        self.pending.fetch_add(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_wait_set_rejects_registration() {
        let mut ws = WaitSet::with_capacity(1);
        assert_eq!(ws.add(EntryKind::Service, "/a").unwrap(), 0);

        let err = ws.add(EntryKind::Service, "/b").unwrap_err();
        assert_eq!(err.kind, ErrorKind::CapacityExceeded);
        assert_eq!(
            err.payload,
            Payload::Occupancy {
                occupied: 1,
                limit: 1
            }
        );

        ws.clear();
        assert!(ws.is_empty());
        assert!(ws.add(EntryKind::Service, "/b").is_ok());
        assert!(ws.contains("/b"));
        assert!(!ws.contains("/a"));
    }

    #[test]
    fn counting_guard_condition_tracks_pending() {
        let gc = CountingGuardCondition::new();
        gc.trigger();
        gc.trigger();

        assert_eq!(gc.take_triggered(), 2);
        assert_eq!(gc.take_triggered(), 0);

        gc.trigger();
        assert_eq!(gc.trigger_count(), 3);
    }
}
