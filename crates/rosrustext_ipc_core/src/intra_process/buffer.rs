use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{CoreError, Result};

use super::{
    AllocationStrategy, CapacityPolicy, HeapAllocation, OwnedMessage, Ownership,
    OwnershipEnvelope, SharedMessage,
};

/// Per-subscription FIFO of intra-process messages.
///
/// Semantics:
/// - producers never block on the consumer; keep-last evicts the oldest entry instead
/// - shared and owned messages may be mixed; each slot remembers its own form
/// - the preferred take mode is fixed at construction and never derived from contents
/// - `has_data` is a lock-free read so the poll thread never contends with producers
#[derive(Debug)]
pub struct IntraProcessBuffer<M> {
    name: String,
    policy: CapacityPolicy,
    // Keep-last depth clamped to the allocator's slot limit.
    evict_at: Option<usize>,
    take_mode: Ownership,
    allocator: Arc<dyn AllocationStrategy>,
    queue: Mutex<VecDeque<OwnershipEnvelope<M>>>,
    // Mirrors queue.len(); only written while the queue lock is held.
    len: AtomicUsize,
    inserted: AtomicU64,
    evicted: AtomicU64,
    consumed: AtomicU64,
}

impl<M> IntraProcessBuffer<M> {
    /// Buffer backed by the global heap.
    pub fn new(name: impl Into<String>, policy: CapacityPolicy, take_mode: Ownership) -> Self {
        Self::with_allocator(name, policy, take_mode, Arc::new(HeapAllocation))
    }

    pub fn with_allocator(
        name: impl Into<String>,
        policy: CapacityPolicy,
        take_mode: Ownership,
        allocator: Arc<dyn AllocationStrategy>,
    ) -> Self {
        let queue = VecDeque::with_capacity(allocator.preallocate(policy));
        let evict_at = policy.capacity().map(|depth| match allocator.slot_limit() {
            Some(limit) => depth.min(limit),
            None => depth,
        });

        Self {
            name: name.into(),
            policy,
            evict_at,
            take_mode,
            allocator,
            queue: Mutex::new(queue),
            len: AtomicUsize::new(0),
            inserted: AtomicU64::new(0),
            evicted: AtomicU64::new(0),
            consumed: AtomicU64::new(0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> CapacityPolicy {
        self.policy
    }

    pub fn take_mode(&self) -> Ownership {
        self.take_mode
    }

    pub fn add_shared(&self, message: SharedMessage<M>) -> Result<()> {
        self.add(OwnershipEnvelope::store_shared(message))
    }

    pub fn add_owned(&self, message: OwnedMessage<M>) -> Result<()> {
        self.add(OwnershipEnvelope::store_owned(message))
    }

    /// Append at the tail, evicting the head first when a keep-last buffer is full.
    ///
    /// A keep-last buffer counts as full at `min(depth, slot limit)`, so it never
    /// refuses a producer. Only keep-all buffers can fail, with `ResourceExhaustion`;
    /// on failure the queue is left untouched.
    pub fn add(&self, envelope: OwnershipEnvelope<M>) -> Result<()> {
        let mut queue = self.lock_queue();

        let evict = matches!(self.evict_at, Some(depth) if depth > 0 && queue.len() >= depth);
        if evict {
            // Occupancy does not grow, so neither the strategy nor the heap is consulted.
            let _stale = queue.pop_front();
            self.evicted.fetch_add(1, Ordering::Relaxed);
        } else {
            self.allocator.admit(queue.len())?;
            queue.try_reserve(1)?;
        }

        queue.push_back(envelope);
        self.len.store(queue.len(), Ordering::Release);
        self.inserted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Wait-set readiness predicate.
    pub fn has_data(&self) -> bool {
        self.len.load(Ordering::Acquire) > 0
    }

    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        !self.has_data()
    }

    pub fn use_take_shared_method(&self) -> bool {
        self.take_mode == Ownership::Shared
    }

    /// Remove the head entry in whatever form it was stored.
    pub fn consume(&self) -> Result<OwnershipEnvelope<M>> {
        let mut queue = self.lock_queue();
        let envelope = queue
            .pop_front()
            .ok_or_else(|| CoreError::empty_buffer(self.name.clone()))?;
        self.len.store(queue.len(), Ordering::Release);
        self.consumed.fetch_add(1, Ordering::Relaxed);
        Ok(envelope)
    }

    /// Ownership form of the head entry, if any.
    pub fn front_ownership(&self) -> Option<Ownership> {
        self.lock_queue().front().map(OwnershipEnvelope::ownership)
    }

    /// Remove the head entry only if it was stored shared.
    ///
    /// On `TypeMismatch` the entry stays queued.
    pub fn take_shared(&self) -> Result<SharedMessage<M>> {
        self.take_matching(Ownership::Shared)?.take_shared()
    }

    /// Remove the head entry only if it was stored owned.
    ///
    /// On `TypeMismatch` the entry stays queued.
    pub fn take_owned(&self) -> Result<OwnedMessage<M>> {
        self.take_matching(Ownership::Owned)?.take_owned()
    }

    fn take_matching(&self, wanted: Ownership) -> Result<OwnershipEnvelope<M>> {
        let mut queue = self.lock_queue();
        let found = queue
            .front()
            .map(OwnershipEnvelope::ownership)
            .ok_or_else(|| CoreError::empty_buffer(self.name.clone()))?;
        if found != wanted {
            return Err(CoreError::type_mismatch(wanted.label(), found.label()));
        }

        let envelope = queue
            .pop_front()
            .ok_or_else(|| CoreError::empty_buffer(self.name.clone()))?;
        self.len.store(queue.len(), Ordering::Release);
        self.consumed.fetch_add(1, Ordering::Relaxed);
        Ok(envelope)
    }

    /// Head entry as a shared message; owned entries are moved into an `Arc`.
    pub fn consume_shared(&self) -> Result<SharedMessage<M>> {
        self.consume().map(OwnershipEnvelope::into_shared)
    }

    /// Drop everything still queued; returns how many entries were discarded.
    pub fn clear(&self) -> usize {
        let mut queue = self.lock_queue();
        let dropped = queue.len();
        queue.clear();
        self.len.store(0, Ordering::Release);
        dropped
    }

    pub fn inserted_count(&self) -> u64 {
        self.inserted.load(Ordering::Relaxed)
    }

    pub fn evicted_count(&self) -> u64 {
        self.evicted.load(Ordering::Relaxed)
    }

    pub fn consumed_count(&self) -> u64 {
        self.consumed.load(Ordering::Relaxed)
    }

    fn lock_queue(&self) -> MutexGuard<'_, VecDeque<OwnershipEnvelope<M>>> {
        // A panicking holder cannot leave the deque half-updated, so the data stays usable.
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<M: Clone> IntraProcessBuffer<M> {
    /// Head entry as an owned message; shared entries are copied unless uniquely held.
    pub fn consume_owned(&self) -> Result<OwnedMessage<M>> {
        self.consume().map(OwnershipEnvelope::into_owned)
    }
}
