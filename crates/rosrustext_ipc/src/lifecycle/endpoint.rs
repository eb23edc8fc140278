use std::sync::Arc;

use rosrustext_ipc_core::lifecycle::ActivationGate;
use rosrustext_ipc_core::wait_set::WaitSetParticipant;

use crate::logging::LogSink;

/// Transport-level entity a lifecycle endpoint wraps.
pub trait TransportEndpoint: WaitSetParticipant {
    /// Topic or service name, used in diagnostics.
    fn name(&self) -> &str;
}

/// Gate plus rate-limited diagnostics shared by every lifecycle endpoint.
pub(crate) struct EndpointGate {
    gate: ActivationGate,
    sink: Arc<dyn LogSink>,
}

impl EndpointGate {
    pub(crate) fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            gate: ActivationGate::new(),
            sink,
        }
    }

    pub(crate) fn gate(&self) -> &ActivationGate {
        &self.gate
    }

    /// True when open. When closed, `describe` is logged once per inactive period.
    pub(crate) fn admit<F>(&self, target: &str, describe: F) -> bool
    where
        F: FnOnce() -> String,
    {
        if self.gate.is_active() {
            return true;
        }
        if self.gate.should_warn_once() {
            self.sink.warn(target, &describe());
        }
        false
    }
}
