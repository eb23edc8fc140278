use std::sync::atomic::{AtomicU64, Ordering};

use rosrustext_ipc_core::wait_set::GuardCondition;
use tokio::sync::Notify;

/// Guard condition an async poll loop can await.
///
/// A trigger with no waiter is remembered, so a waiter that arrives late still wakes.
#[derive(Debug, Default)]
pub struct NotifyGuardCondition {
    notify: Notify,
    triggered: AtomicU64,
}

impl NotifyGuardCondition {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn wait_triggered(&self) {
        self.notify.notified().await;
    }

    pub fn trigger_count(&self) -> u64 {
        self.triggered.load(Ordering::Acquire)
    }
}

impl GuardCondition for NotifyGuardCondition {
    fn trigger(&self) {
        self.triggered.fetch_add(1, Ordering::AcqRel);
        self.notify.notify_one();
    }
}
