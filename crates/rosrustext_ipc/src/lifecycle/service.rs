use std::sync::Arc;

use rosrustext_ipc_core::lifecycle::ManagedEntity;
use rosrustext_ipc_core::wait_set::{WaitSet, WaitSetParticipant};

use super::endpoint::{EndpointGate, TransportEndpoint};
use crate::logging::LogSink;

/// Service that stops taking part in waits while deactivated.
///
/// Requests keep arriving at the transport; they are simply not waited on until
/// the service is activated again.
pub struct LifecycleService<S> {
    inner: Arc<S>,
    gate: EndpointGate,
}

impl<S: TransportEndpoint> LifecycleService<S> {
    pub fn new(inner: Arc<S>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            inner,
            gate: EndpointGate::new(sink),
        }
    }

    pub fn service_name(&self) -> &str {
        self.inner.name()
    }

    /// Access to the underlying service (escape hatch).
    pub fn inner(&self) -> &Arc<S> {
        &self.inner
    }
}

impl<S: TransportEndpoint> WaitSetParticipant for LifecycleService<S> {
    fn add_to_wait_set(&self, wait_set: &mut WaitSet) -> bool {
        let name = self.inner.name();
        if !self.gate.admit(name, || {
            format!("Trying to wait for the service '{name}', but the service is not activated")
        }) {
            return true;
        }
        self.inner.add_to_wait_set(wait_set)
    }

    fn is_ready(&self, wait_set: &WaitSet) -> bool {
        self.gate.gate().is_active() && self.inner.is_ready(wait_set)
    }
}

impl<S: TransportEndpoint> ManagedEntity for LifecycleService<S> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::RecordingLogSink;
    use crate::testing::FakeTransport;

    #[test]
    fn inactive_service_does_not_register() {
        let transport = Arc::new(FakeTransport::new("/get_map"));
        let sink = Arc::new(RecordingLogSink::new());
        let service = LifecycleService::new(Arc::clone(&transport), sink.clone());
        let mut ws = WaitSet::with_capacity(4);

        assert!(service.add_to_wait_set(&mut ws));
        assert!(ws.is_empty());
        assert_eq!(transport.registrations(), 0);
        assert_eq!(sink.warnings(), 1);
        assert!(sink.lines()[0].message.contains("service '/get_map'"));
    }

    #[test]
    fn active_service_returns_transport_result() {
        let transport = Arc::new(FakeTransport::new("/get_map"));
        transport.set_registration_result(false);
        let sink = Arc::new(RecordingLogSink::new());
        let service = LifecycleService::new(Arc::clone(&transport), sink.clone());
        service.on_activate();

        let mut ws = WaitSet::with_capacity(4);
        assert!(!service.add_to_wait_set(&mut ws));
        assert_eq!(transport.registrations(), 1);
        assert_eq!(sink.warnings(), 0);
    }

    #[test]
    fn readiness_is_masked_while_inactive() {
        let transport = Arc::new(FakeTransport::new("/get_map"));
        transport.set_ready(true);
        let sink = Arc::new(RecordingLogSink::new());
        let service = LifecycleService::new(Arc::clone(&transport), sink);
        let ws = WaitSet::with_capacity(1);

        assert!(!service.is_ready(&ws));
        service.on_activate();
        assert!(service.is_ready(&ws));
    }
}
