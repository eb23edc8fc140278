use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;

use rosrustext_ipc_core::lifecycle::ManagedEntity;

use super::endpoint::EndpointGate;
use crate::logging::LogSink;

/// Minimal async publish capability.
///
/// This is intentionally tiny so we can:
/// - unit test gating without a transport
/// - plug in either a middleware publisher or an `IntraProcessTopic`
pub trait PublishLike<T>: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    fn publish<'a>(
        &'a self,
        msg: &'a T,
    ) -> Pin<Box<dyn Future<Output = Result<(), Self::Error>> + Send + 'a>>;
}

/// Lifecycle-gated publisher wrapper.
///
/// - publish attempts are suppressed unless activated
/// - the first suppressed publish of each inactive period is logged, later ones are silent
/// - wrapper owns no transport; it wraps any `PublishLike` implementation
pub struct LifecyclePublisher<T, P>
where
    P: PublishLike<T>,
{
    topic: String,
    inner: Arc<P>,
    gate: EndpointGate,
    _phantom: PhantomData<fn(&T)>,
}

impl<T, P> LifecyclePublisher<T, P>
where
    P: PublishLike<T>,
{
    pub fn new(topic: impl Into<String>, inner: Arc<P>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            topic: topic.into(),
            inner,
            gate: EndpointGate::new(sink),
            _phantom: PhantomData,
        }
    }

    pub fn topic_name(&self) -> &str {
        &self.topic
    }

    /// Publish only when activated.
    ///
    /// Returns:
    /// - Ok(true): published
    /// - Ok(false): suppressed because inactive
    /// - Err(_): underlying publisher error
    pub async fn publish(&self, msg: &T) -> Result<bool, P::Error> {
        let topic = self.topic.as_str();
        if !self.gate.admit(topic, || {
            format!("Trying to publish message on the topic '{topic}', but the publisher is not activated")
        }) {
            return Ok(false);
        }
        self.inner.publish(msg).await?;
        Ok(true)
    }

    /// Access to the underlying publisher (escape hatch).
    pub fn inner(&self) -> &Arc<P> {
        &self.inner
    }
}

impl<T, P> ManagedEntity for LifecyclePublisher<T, P>
where
    P: PublishLike<T>,
{
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
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct DummyError;

    impl std::fmt::Display for DummyError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "dummy error")
        }
    }
    impl std::error::Error for DummyError {}

    struct DummyPublisher {
        calls: AtomicUsize,
    }

    impl DummyPublisher {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::Relaxed)
        }
    }

    impl PublishLike<String> for DummyPublisher {
        type Error = DummyError;

        fn publish<'a>(
            &'a self,
            _msg: &'a String,
        ) -> Pin<Box<dyn Future<Output = Result<(), Self::Error>> + Send + 'a>> {
            Box::pin(async move {
                self.calls.fetch_add(1, Ordering::Relaxed);
                Ok(())
            })
        }
    }

    #[tokio::test]
    async fn suppressed_when_inactive_and_warns_once() {
        let inner = Arc::new(DummyPublisher::new());
        let sink = Arc::new(RecordingLogSink::new());
        let pub_ = LifecyclePublisher::<String, _>::new("/chatter", inner.clone(), sink.clone());

        for _ in 0..3 {
            let ok = pub_.publish(&"hello".to_string()).await.unwrap();
            assert!(!ok);
        }
        assert_eq!(inner.calls(), 0);
        assert_eq!(sink.warnings(), 1);
        assert!(sink.lines()[0].message.contains("topic '/chatter'"));
    }

    #[tokio::test]
    async fn publishes_when_active() {
        let inner = Arc::new(DummyPublisher::new());
        let sink = Arc::new(RecordingLogSink::new());
        let pub_ = LifecyclePublisher::<String, _>::new("/chatter", inner.clone(), sink.clone());
        pub_.on_activate();

        let ok = pub_.publish(&"hello".to_string()).await.unwrap();
        assert!(ok);
        assert_eq!(inner.calls(), 1);
        assert_eq!(sink.warnings(), 0);
    }

    #[tokio::test]
    async fn warning_rearms_after_each_deactivation() {
        let inner = Arc::new(DummyPublisher::new());
        let sink = Arc::new(RecordingLogSink::new());
        let pub_ = LifecyclePublisher::<String, _>::new("/chatter", inner.clone(), sink.clone());
        let msg = "hello".to_string();

        pub_.publish(&msg).await.unwrap();
        pub_.on_activate();
        pub_.publish(&msg).await.unwrap();
        pub_.on_deactivate();
        pub_.publish(&msg).await.unwrap();
        pub_.publish(&msg).await.unwrap();

        assert_eq!(inner.calls(), 1);
        assert_eq!(sink.warnings(), 2);
    }
}
