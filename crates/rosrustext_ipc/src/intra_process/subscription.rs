use std::sync::Arc;

use rosrustext_ipc_core::error::Result;
use rosrustext_ipc_core::intra_process::{
    AllocationStrategy, HeapAllocation, IntraProcessBuffer, OwnedMessage, OwnershipEnvelope,
    SharedMessage,
};
use rosrustext_ipc_core::wait_set::{EntryKind, GuardCondition, WaitSet, WaitSetParticipant};

use crate::config::IntraProcessConfig;
use crate::lifecycle::TransportEndpoint;

/// Receiving end of an intra-process topic.
///
/// Owns the buffer and the guard condition that wakes the poll loop. Every
/// successful insertion triggers the guard condition exactly once, whether or
/// not a lifecycle wrapper currently gates this subscription.
pub struct IntraProcessSubscription<M> {
    topic: String,
    buffer: IntraProcessBuffer<M>,
    guard: Arc<dyn GuardCondition>,
}

impl<M> IntraProcessSubscription<M>
where
    M: Send + Sync + 'static,
{
    /// `callback_prefers_shared` resolves `BufferType::CallbackDefault`.
    pub fn new(
        topic: impl Into<String>,
        config: &IntraProcessConfig,
        callback_prefers_shared: bool,
        guard: Arc<dyn GuardCondition>,
    ) -> Self {
        Self::with_allocator(
            topic,
            config,
            callback_prefers_shared,
            guard,
            Arc::new(HeapAllocation),
        )
    }

    pub fn with_allocator(
        topic: impl Into<String>,
        config: &IntraProcessConfig,
        callback_prefers_shared: bool,
        guard: Arc<dyn GuardCondition>,
        allocator: Arc<dyn AllocationStrategy>,
    ) -> Self {
        let topic = topic.into();
        let take_mode = config.buffer_type.resolve(callback_prefers_shared);
        let buffer =
            IntraProcessBuffer::with_allocator(topic.clone(), config.history, take_mode, allocator);

        Self {
            topic,
            buffer,
            guard,
        }
    }

    /// Accepts `Arc<M>` (shared) or `Box<M>` (owned).
    pub fn provide_intra_process_message(
        &self,
        message: impl Into<OwnershipEnvelope<M>>,
    ) -> Result<()> {
        self.buffer.add(message.into())?;
        self.guard.trigger();
        Ok(())
    }

    pub fn use_take_shared_method(&self) -> bool {
        self.buffer.use_take_shared_method()
    }

    pub fn consume(&self) -> Result<OwnershipEnvelope<M>> {
        self.buffer.consume()
    }

    pub fn consume_shared(&self) -> Result<SharedMessage<M>> {
        self.buffer.consume_shared()
    }

    /// Head entry only if it was stored shared; a mismatch leaves it queued.
    pub fn take_shared(&self) -> Result<SharedMessage<M>> {
        self.buffer.take_shared()
    }

    /// Head entry only if it was stored owned; a mismatch leaves it queued.
    pub fn take_owned(&self) -> Result<OwnedMessage<M>> {
        self.buffer.take_owned()
    }

    pub fn buffer(&self) -> &IntraProcessBuffer<M> {
        &self.buffer
    }
}

impl<M> IntraProcessSubscription<M>
where
    M: Clone + Send + Sync + 'static,
{
    pub fn consume_owned(&self) -> Result<OwnedMessage<M>> {
        self.buffer.consume_owned()
    }
}

impl<M> WaitSetParticipant for IntraProcessSubscription<M>
where
    M: Send + Sync + 'static,
{
    fn add_to_wait_set(&self, wait_set: &mut WaitSet) -> bool {
        wait_set
            .add(EntryKind::GuardCondition, self.topic.as_str())
            .is_ok()
    }

    fn is_ready(&self, _wait_set: &WaitSet) -> bool {
        self.buffer.has_data()
    }
}

impl<M> TransportEndpoint for IntraProcessSubscription<M>
where
    M: Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.topic
    }
}
