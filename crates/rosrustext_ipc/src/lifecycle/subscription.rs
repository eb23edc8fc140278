use std::sync::Arc;

use rosrustext_ipc_core::error::Result;
use rosrustext_ipc_core::intra_process::{OwnedMessage, OwnershipEnvelope, SharedMessage};
use rosrustext_ipc_core::lifecycle::ManagedEntity;
use rosrustext_ipc_core::wait_set::{WaitSet, WaitSetParticipant};

use super::endpoint::{EndpointGate, TransportEndpoint};
use crate::intra_process::IntraProcessSubscription;
use crate::logging::LogSink;

/// Subscription that stops taking part in waits while deactivated.
///
/// Delivery is never gated: messages provided while inactive stay buffered
/// (subject to the buffer's history policy) and become visible on activation.
pub struct LifecycleSubscription<S> {
    inner: Arc<S>,
    gate: EndpointGate,
}

impl<S: TransportEndpoint> LifecycleSubscription<S> {
    pub fn new(inner: Arc<S>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            inner,
            gate: EndpointGate::new(sink),
        }
    }

    pub fn topic_name(&self) -> &str {
        self.inner.name()
    }

    /// Access to the underlying subscription (escape hatch).
    pub fn inner(&self) -> &Arc<S> {
        &self.inner
    }
}

impl<M> LifecycleSubscription<IntraProcessSubscription<M>>
where
    M: Send + Sync + 'static,
{
    pub fn provide_intra_process_message(
        &self,
        message: impl Into<OwnershipEnvelope<M>>,
    ) -> Result<()> {
        self.inner.provide_intra_process_message(message)
    }

    pub fn use_take_shared_method(&self) -> bool {
        self.inner.use_take_shared_method()
    }

    pub fn consume(&self) -> Result<OwnershipEnvelope<M>> {
        self.inner.consume()
    }

    pub fn consume_shared(&self) -> Result<SharedMessage<M>> {
        self.inner.consume_shared()
    }

    pub fn take_shared(&self) -> Result<SharedMessage<M>> {
        self.inner.take_shared()
    }

    pub fn take_owned(&self) -> Result<OwnedMessage<M>> {
        self.inner.take_owned()
    }
}

impl<M> LifecycleSubscription<IntraProcessSubscription<M>>
where
    M: Clone + Send + Sync + 'static,
{
    pub fn consume_owned(&self) -> Result<OwnedMessage<M>> {
        self.inner.consume_owned()
    }
}

impl<S: TransportEndpoint> WaitSetParticipant for LifecycleSubscription<S> {
    fn add_to_wait_set(&self, wait_set: &mut WaitSet) -> bool {
        let name = self.inner.name();
        if !self.gate.admit(name, || {
            format!(
                "Trying to wait for the subscription '{name}', but the subscription is not activated"
            )
        }) {
            return true;
        }
        self.inner.add_to_wait_set(wait_set)
    }

    fn is_ready(&self, wait_set: &WaitSet) -> bool {
        self.gate.gate().is_active() && self.inner.is_ready(wait_set)
    }
}

impl<S: TransportEndpoint> ManagedEntity for LifecycleSubscription<S> {
    fn on_activate(&self) {
        self.gate.gate().activate();
    }

    fn on_deactivate(&self) {
        self.gate.gate().deactivate();
    }

    fn is_activated(&self) -> bool {
        self.gate.gate().is_active()
    }
}
