use std::sync::atomic::{AtomicBool, Ordering};

/// Activation gate for managed communication entities.
///
/// Intended use (endpoint layer):
/// - `activate()` when the owning node becomes Active
/// - `deactivate()` when it leaves Active
/// - endpoints check `is_active()` before taking part in a wait or a publish
/// - `should_warn_once()` rate-limits the "not activated" diagnostic to one per inactive period
#[derive(Debug)]
pub struct ActivationGate {
    active: AtomicBool,
    warned_since_deactivation: AtomicBool,
}

impl ActivationGate {
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            warned_since_deactivation: AtomicBool::new(false),
        }
    }

    pub fn activate(&self) {
        self.active.store(true, Ordering::Release);
    }

    /// Closes the gate and re-arms the one-shot warning, even when already inactive.
    pub fn deactivate(&self) {
        // Re-arm before closing so a poller that observes the closed gate also observes the reset.
        self.warned_since_deactivation.store(false, Ordering::Release);
        self.active.store(false, Ordering::Release);
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// True exactly once per inactive period; always false while active.
    pub fn should_warn_once(&self) -> bool {
        if self.is_active() {
            return false;
        }
        !self.warned_since_deactivation.swap(true, Ordering::AcqRel)
    }
}

impl Default for ActivationGate {
    fn default() -> Self {
        Self::new()
    }
}
