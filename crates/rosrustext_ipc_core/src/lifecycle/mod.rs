//! rosrustext_ipc_core::lifecycle
//!
//! The binary activation gate each managed entity exposes to a lifecycle manager.
//! This module intentionally contains **no** lifecycle state machine.
//!
//! Key ideas:
//! - Each entity owns exactly one `ActivationGate`
//! - `ManagedEntity` is the capability a lifecycle manager drives
//! - Gating applies to polling and publishing, never to buffering

mod gate;

pub use gate::ActivationGate;

/// Capability implemented by every activation-gated endpoint.
///
/// A lifecycle manager calls `on_activate` when entering Active and `on_deactivate`
/// when leaving it. `is_activated` reflects the last of those calls and nothing else.
pub trait ManagedEntity: Send + Sync {
    fn on_activate(&self);
    fn on_deactivate(&self);
    fn is_activated(&self) -> bool;
}

impl ManagedEntity for ActivationGate {
    fn on_activate(&self) {
        self.activate();
    }

    fn on_deactivate(&self) {
        self.deactivate();
    }

    fn is_activated(&self) -> bool {
        self.is_active()
    }
}
