use std::sync::Arc;

use anyhow::{Context, Result};
use rosrustext_ipc::intra_process::{IntraProcessSubscription, IntraProcessTopic};
use rosrustext_ipc::lifecycle::{LifecycleNode, LifecycleSubscription, ManagedEntity};
use rosrustext_ipc::logging::{log_core_error, LogSink};
use rosrustext_ipc::wait_set::NotifyGuardCondition;
use rosrustext_ipc::{WaitSet, WaitSetParticipant};
use rosrustext_ipc_core::error::ErrorKind;
use tracing::info;

use crate::config::Config;

type ProbeSubscription = LifecycleSubscription<IntraProcessSubscription<String>>;

/// Counts gathered over one probe run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    /// Publishes suppressed by the gated publisher while inactive.
    pub suppressed: usize,
    /// Publishes accepted by the gated publisher while active.
    pub published: usize,
    /// Messages each subscription consumed, in creation order.
    pub consumed: Vec<usize>,
    /// Messages each subscription's buffer evicted.
    pub evicted: Vec<u64>,
    /// Poll cycles in which at least one subscription reported ready.
    pub ready_polls: usize,
}

/// Wire `config.subscriptions` subscriptions to one topic and drive a
/// inactive → active → inactive (direct delivery) → active cycle through them.
pub async fn run(config: &Config, sink: Arc<dyn LogSink>) -> Result<Report> {
    let node = LifecycleNode::with_config("rosrustext_ipc_probe", Arc::clone(&sink), config.ipc)
        .context("create probe node")?;
    let topic = Arc::new(IntraProcessTopic::<String>::new(config.topic.as_str()));

    let subscriptions = (0..config.subscriptions)
        .map(|i| {
            // Alternate callback preference so both take modes are exercised.
            node.create_intra_process_subscription(
                &topic,
                i % 2 == 0,
                Arc::new(NotifyGuardCondition::new()),
            )
        })
        .collect::<rosrustext_ipc_core::error::Result<Vec<_>>>()
        .context("wire intra-process subscriptions")?;
    let publisher = node.create_publisher::<String, _>(config.topic.as_str(), Arc::clone(&topic));

    let mut report = Report {
        consumed: vec![0; subscriptions.len()],
        ..Report::default()
    };
    let mut wait_set = WaitSet::with_capacity(subscriptions.len());

    for i in 0..config.messages {
        if !publisher.publish(&format!("inactive-{i}")).await? {
            report.suppressed += 1;
        }
    }
    poll(&subscriptions, &mut wait_set, sink.as_ref(), &mut report);

    node.on_activate();
    for i in 0..config.messages {
        if publisher.publish(&format!("active-{i}")).await? {
            report.published += 1;
        }
    }
    poll(&subscriptions, &mut wait_set, sink.as_ref(), &mut report);

    node.on_deactivate();
    for i in 0..config.messages {
        topic
            .publish_owned(Box::new(format!("buffered-{i}")))
            .context("deliver while inactive")?;
    }
    poll(&subscriptions, &mut wait_set, sink.as_ref(), &mut report);

    node.on_activate();
    poll(&subscriptions, &mut wait_set, sink.as_ref(), &mut report);

    report.evicted = subscriptions
        .iter()
        .map(|s| s.inner().buffer().evicted_count())
        .collect();

    info!(
        topic = %config.topic,
        suppressed = report.suppressed,
        published = report.published,
        ready_polls = report.ready_polls,
        "probe finished"
    );
    Ok(report)
}

/// One poll cycle: register, check readiness, drain whatever is ready.
fn poll(
    subscriptions: &[Arc<ProbeSubscription>],
    wait_set: &mut WaitSet,
    sink: &dyn LogSink,
    report: &mut Report,
) {
    wait_set.clear();
    for sub in subscriptions {
        if !sub.add_to_wait_set(wait_set) {
            tracing::warn!(topic = sub.topic_name(), "wait set registration failed");
        }
    }

    let mut any_ready = false;
    for (slot, sub) in subscriptions.iter().enumerate() {
        if !sub.is_ready(wait_set) {
            continue;
        }
        any_ready = true;
        loop {
            match take(sub) {
                Ok(message) => {
                    tracing::debug!(topic = sub.topic_name(), slot, %message, "consumed");
                    report.consumed[slot] += 1;
                }
                Err(err) if err.kind == ErrorKind::EmptyBuffer => break,
                Err(err) => {
                    log_core_error(sink, sub.topic_name(), &err);
                    break;
                }
            }
        }
    }
    if any_ready {
        report.ready_polls += 1;
    }
    tracing::trace!(
        active = subscriptions.iter().all(|s| s.is_activated()),
        "poll done"
    );
}

fn take(sub: &ProbeSubscription) -> rosrustext_ipc_core::error::Result<String> {
    if sub.use_take_shared_method() {
        sub.consume_shared().map(|m| (*m).clone())
    } else {
        sub.consume_owned().map(|m| *m)
    }
}
