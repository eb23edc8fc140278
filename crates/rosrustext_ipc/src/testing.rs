use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use rosrustext_ipc_core::wait_set::{EntryKind, WaitSet, WaitSetParticipant};

use crate::lifecycle::TransportEndpoint;

/// Transport stand-in that records registrations.
pub(crate) struct FakeTransport {
    name: String,
    kind: EntryKind,
    registrations: AtomicUsize,
    registration_result: AtomicBool,
    ready: AtomicBool,
}

impl FakeTransport {
    pub(crate) fn new(name: &str) -> Self {
        Self::with_kind(name, EntryKind::Service)
    }

    pub(crate) fn subscription(name: &str) -> Self {
        Self::with_kind(name, EntryKind::Subscription)
    }

    fn with_kind(name: &str, kind: EntryKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            registrations: AtomicUsize::new(0),
            registration_result: AtomicBool::new(true),
            ready: AtomicBool::new(false),
        }
    }

    pub(crate) fn registrations(&self) -> usize {
        self.registrations.load(Ordering::Relaxed)
    }

    pub(crate) fn set_registration_result(&self, result: bool) {
        self.registration_result.store(result, Ordering::Relaxed);
    }

    pub(crate) fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Relaxed);
    }
}

impl WaitSetParticipant for FakeTransport {
    fn add_to_wait_set(&self, wait_set: &mut WaitSet) -> bool {
        self.registrations.fetch_add(1, Ordering::Relaxed);
        if !self.registration_result.load(Ordering::Relaxed) {
            return false;
        }
        wait_set.add(self.kind, self.name.as_str()).is_ok()
    }

    fn is_ready(&self, _wait_set: &WaitSet) -> bool {
        self.ready.load(Ordering::Relaxed)
    }
}

impl TransportEndpoint for FakeTransport {
    fn name(&self) -> &str {
        &self.name
    }
}
