use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use rosrustext_ipc_core::error::{CoreError, Domain, ErrorKind, Result};
use rosrustext_ipc_core::lifecycle::{ActivationGate, ManagedEntity};
use rosrustext_ipc_core::wait_set::GuardCondition;

use super::{
    LifecyclePublisher, LifecycleService, LifecycleSubscription, PublishLike, TransportEndpoint,
};
use crate::config::IntraProcessConfig;
use crate::intra_process::{IntraProcessSubscription, IntraProcessTopic};
use crate::logging::LogSink;

/// Owner of a set of lifecycle endpoints.
///
/// Responsibilities:
/// - Hand its log sink and intra-process config to every endpoint it creates
/// - Fan `on_activate` / `on_deactivate` out to every endpoint still alive
///
/// Deciding *when* to activate is the caller's business; this is not a state machine.
/// Endpoints are held weakly: the caller owns them and dropping one destroys it.
/// New endpoints start deactivated, whatever the node's current state.
pub struct LifecycleNode {
    name: String,
    gate: ActivationGate,
    sink: Arc<dyn LogSink>,
    config: IntraProcessConfig,
    entities: Mutex<Vec<Weak<dyn ManagedEntity>>>,
}

/// Public API (library user facing).
impl LifecycleNode {
    pub fn new(name: impl Into<String>, sink: Arc<dyn LogSink>) -> Result<Self> {
        Self::with_config(name, sink, IntraProcessConfig::default())
    }

    pub fn with_config(
        name: impl Into<String>,
        sink: Arc<dyn LogSink>,
        config: IntraProcessConfig,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(CoreError::error()
                .domain(Domain::Lifecycle)
                .kind(ErrorKind::InvalidArgument)
                .msg("node name must not be empty")
                .build());
        }

        Ok(Self {
            name,
            gate: ActivationGate::new(),
            sink,
            config,
            entities: Mutex::new(Vec::new()),
        })
    }

    /// Node name (for logging/introspection).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &IntraProcessConfig {
        &self.config
    }

    /// Endpoints created by this node and still alive.
    pub fn entity_count(&self) -> usize {
        self.lock_entities()
            .iter()
            .filter(|e| e.strong_count() > 0)
            .count()
    }

    pub fn create_service<S>(&self, inner: Arc<S>) -> Arc<LifecycleService<S>>
    where
        S: TransportEndpoint + 'static,
    {
        let service = Arc::new(LifecycleService::new(inner, Arc::clone(&self.sink)));
        self.register(service.clone());
        service
    }

    pub fn create_subscription<S>(&self, inner: Arc<S>) -> Arc<LifecycleSubscription<S>>
    where
        S: TransportEndpoint + 'static,
    {
        let subscription = Arc::new(LifecycleSubscription::new(inner, Arc::clone(&self.sink)));
        self.register(subscription.clone());
        subscription
    }

    /// Build an intra-process subscription from the node config and wire it to `topic`.
    pub fn create_intra_process_subscription<M>(
        &self,
        topic: &IntraProcessTopic<M>,
        callback_prefers_shared: bool,
        guard: Arc<dyn GuardCondition>,
    ) -> Result<Arc<LifecycleSubscription<IntraProcessSubscription<M>>>>
    where
        M: Send + Sync + 'static,
    {
        let inner = Arc::new(IntraProcessSubscription::new(
            topic.name(),
            &self.config,
            callback_prefers_shared,
            guard,
        ));
        topic.add_subscription(&inner)?;

        tracing::debug!(
            node = %self.name,
            topic = topic.name(),
            take_shared = inner.use_take_shared_method(),
            "intra-process subscription wired"
        );
        Ok(self.create_subscription(inner))
    }

    pub fn create_publisher<T, P>(
        &self,
        topic: impl Into<String>,
        inner: Arc<P>,
    ) -> Arc<LifecyclePublisher<T, P>>
    where
        T: 'static,
        P: PublishLike<T>,
    {
        let publisher = Arc::new(LifecyclePublisher::new(topic, inner, Arc::clone(&self.sink)));
        self.register(publisher.clone());
        publisher
    }

    fn register(&self, entity: Arc<dyn ManagedEntity>) {
        self.lock_entities().push(Arc::downgrade(&entity));
    }

    fn lock_entities(&self) -> MutexGuard<'_, Vec<Weak<dyn ManagedEntity>>> {
        match self.entities.lock() {
            Ok(guard) => guard,
            Err(poison) => {
                tracing::warn!(node = %self.name, "lifecycle entity list poisoned");
                poison.into_inner()
            }
        }
    }

    /// Prune dead endpoints, then apply `f` to the live ones.
    fn for_each_entity(&self, f: impl Fn(&dyn ManagedEntity)) {
        let live: Vec<Arc<dyn ManagedEntity>> = {
            let mut entities = self.lock_entities();
            entities.retain(|e| e.strong_count() > 0);
            entities.iter().filter_map(Weak::upgrade).collect()
        };
        for entity in &live {
            f(entity.as_ref());
        }
    }
}

impl ManagedEntity for LifecycleNode {
    fn on_activate(&self) {
        self.gate.activate();
        self.for_each_entity(|e| e.on_activate());
        tracing::info!(node = %self.name, "endpoints activated");
    }

    fn on_deactivate(&self) {
        self.gate.deactivate();
        self.for_each_entity(|e| e.on_deactivate());
        tracing::info!(node = %self.name, "endpoints deactivated");
    }

    fn is_activated(&self) -> bool {
        self.gate.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::RecordingLogSink;
    use crate::testing::FakeTransport;
    use rosrustext_ipc_core::wait_set::{
        CountingGuardCondition, EntryKind, WaitSet, WaitSetParticipant,
    };

    fn node() -> LifecycleNode {
        LifecycleNode::new("talker", Arc::new(RecordingLogSink::new())).unwrap()
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = LifecycleNode::new("", Arc::new(RecordingLogSink::new()))
            .err()
            .unwrap();
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }

    #[test]
    fn activation_fans_out_to_live_endpoints() {
        let node = node();
        let service = node.create_service(Arc::new(FakeTransport::new("/reset")));
        let subscription = node.create_subscription(Arc::new(FakeTransport::subscription("/cmd")));
        assert!(!service.is_activated());

        node.on_activate();
        assert!(node.is_activated());
        assert!(service.is_activated());
        assert!(subscription.is_activated());

        let mut ws = WaitSet::with_capacity(2);
        assert!(service.add_to_wait_set(&mut ws));
        assert!(subscription.add_to_wait_set(&mut ws));
        let kinds: Vec<EntryKind> = ws.entries().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, [EntryKind::Service, EntryKind::Subscription]);

        drop(subscription);
        assert_eq!(node.entity_count(), 1);

        node.on_deactivate();
        assert!(!node.is_activated());
        assert!(!service.is_activated());
    }

    #[test]
    fn endpoints_created_after_activation_start_inactive() {
        let node = node();
        node.on_activate();

        let topic: IntraProcessTopic<u32> = IntraProcessTopic::new("/late");
        let sub = node
            .create_intra_process_subscription(
                &topic,
                true,
                Arc::new(CountingGuardCondition::new()),
            )
            .unwrap();
        assert!(!sub.is_activated());
        assert_eq!(topic.subscription_count(), 1);

        drop(sub);
        assert_eq!(topic.subscription_count(), 0);
    }
}
