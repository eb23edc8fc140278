use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, PoisonError, RwLock, Weak};

use rosrustext_ipc_core::error::{CoreError, Domain, ErrorKind, Result};
use rosrustext_ipc_core::intra_process::{OwnedMessage, SharedMessage};

use super::IntraProcessSubscription;
use crate::lifecycle::{PublishLike, TransportEndpoint};

/// In-process wiring between one topic's publishers and its subscriptions.
///
/// Delivery rules:
/// - subscriptions that take shared messages all receive the same `Arc`
/// - subscriptions that take owned messages each receive their own box; the
///   last one receives the publisher's original allocation when it was owned
/// - subscriptions are held weakly, a dropped subscription is pruned on the next publish
pub struct IntraProcessTopic<M> {
    name: String,
    subscriptions: RwLock<Vec<Weak<IntraProcessSubscription<M>>>>,
}

impl<M> IntraProcessTopic<M>
where
    M: Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subscriptions: RwLock::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Join `subscription` to this topic. Registering the same subscription again is a no-op.
    pub fn add_subscription(&self, subscription: &Arc<IntraProcessSubscription<M>>) -> Result<()> {
        if subscription.name() != self.name {
            return Err(CoreError::warn()
                .domain(Domain::IntraProcess)
                .kind(ErrorKind::InvalidArgument)
                .msgf(format_args!(
                    "subscription '{}' cannot join topic '{}'",
                    subscription.name(),
                    self.name
                ))
                .build());
        }

        let candidate = Arc::downgrade(subscription);
        let mut subscriptions = self
            .subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if !subscriptions.iter().any(|s| s.ptr_eq(&candidate)) {
            subscriptions.push(candidate);
        }
        Ok(())
    }

    /// Live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|s| s.strong_count() > 0)
            .count()
    }

    /// Live subscriptions split into (shared takers, owned takers).
    #[allow(clippy::type_complexity)]
    fn live_split(
        &self,
    ) -> (
        Vec<Arc<IntraProcessSubscription<M>>>,
        Vec<Arc<IntraProcessSubscription<M>>>,
    ) {
        let mut subscriptions = self
            .subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        subscriptions.retain(|s| s.strong_count() > 0);

        subscriptions
            .iter()
            .filter_map(Weak::upgrade)
            .partition(|s| s.use_take_shared_method())
    }
}

impl<M> IntraProcessTopic<M>
where
    M: Clone + Send + Sync + 'static,
{
    /// Returns how many subscriptions accepted the message.
    ///
    /// A failing subscription does not stop delivery to the others; the first
    /// failure is returned once everyone else has been served.
    pub fn publish_owned(&self, message: OwnedMessage<M>) -> Result<usize> {
        let (shared, owned) = self.live_split();
        let mut delivery = Delivery::default();

        match owned.split_last() {
            None => {
                let message: SharedMessage<M> = Arc::from(message);
                for sub in &shared {
                    delivery.record(sub.provide_intra_process_message(Arc::clone(&message)));
                }
            }
            Some((last, rest)) => {
                if !shared.is_empty() {
                    let copy = Arc::new((*message).clone());
                    for sub in &shared {
                        delivery.record(sub.provide_intra_process_message(Arc::clone(&copy)));
                    }
                }
                for sub in rest {
                    let copy = Box::new((*message).clone());
                    delivery.record(sub.provide_intra_process_message(copy));
                }
                delivery.record(last.provide_intra_process_message(message));
            }
        }

        delivery.finish()
    }

    /// Shared takers get the same `Arc`; owned takers each get a copy.
    pub fn publish_shared(&self, message: SharedMessage<M>) -> Result<usize> {
        let (shared, owned) = self.live_split();
        let mut delivery = Delivery::default();

        for sub in &shared {
            delivery.record(sub.provide_intra_process_message(Arc::clone(&message)));
        }
        for sub in &owned {
            let copy = Box::new((*message).clone());
            delivery.record(sub.provide_intra_process_message(copy));
        }

        delivery.finish()
    }
}

impl<M> PublishLike<M> for IntraProcessTopic<M>
where
    M: Clone + Send + Sync + 'static,
{
    type Error = CoreError;

    fn publish<'a>(
        &'a self,
        msg: &'a M,
    ) -> Pin<Box<dyn Future<Output = std::result::Result<(), Self::Error>> + Send + 'a>> {
        Box::pin(async move { self.publish_owned(Box::new(msg.clone())).map(|_| ()) })
    }
}

#[derive(Default)]
struct Delivery {
    delivered: usize,
    first_error: Option<CoreError>,
}

impl Delivery {
    fn record(&mut self, outcome: Result<()>) {
        match outcome {
            Ok(()) => self.delivered += 1,
            Err(err) => {
                self.first_error.get_or_insert(err);
            }
        }
    }

    fn finish(self) -> Result<usize> {
        match self.first_error {
            Some(err) => Err(err),
            None => Ok(self.delivered),
        }
    }
}
