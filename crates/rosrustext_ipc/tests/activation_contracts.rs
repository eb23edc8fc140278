use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rosrustext_ipc::config::IntraProcessConfig;
use rosrustext_ipc::intra_process::IntraProcessTopic;
use rosrustext_ipc::lifecycle::{LifecycleNode, LifecycleService, ManagedEntity, TransportEndpoint};
use rosrustext_ipc::logging::RecordingLogSink;
use rosrustext_ipc::wait_set::NotifyGuardCondition;
use rosrustext_ipc::{BufferType, CapacityPolicy, WaitSet, WaitSetParticipant};
use rosrustext_ipc_core::error::ErrorKind;
use rosrustext_ipc_core::wait_set::{CountingGuardCondition, EntryKind};

struct TransportService {
    name: &'static str,
    registrations: AtomicUsize,
    result: AtomicBool,
}

impl TransportService {
    fn new(name: &'static str, result: bool) -> Self {
        Self {
            name,
            registrations: AtomicUsize::new(0),
            result: AtomicBool::new(result),
        }
    }

    fn registrations(&self) -> usize {
        self.registrations.load(Ordering::SeqCst)
    }
}

impl WaitSetParticipant for TransportService {
    fn add_to_wait_set(&self, wait_set: &mut WaitSet) -> bool {
        self.registrations.fetch_add(1, Ordering::SeqCst);
        let _ = wait_set.add(EntryKind::Service, self.name);
        self.result.load(Ordering::SeqCst)
    }

    fn is_ready(&self, _wait_set: &WaitSet) -> bool {
        false
    }
}

impl TransportEndpoint for TransportService {
    fn name(&self) -> &str {
        self.name
    }
}

#[test]
fn inactive_active_inactive_scenario() {
    let transport = Arc::new(TransportService::new("/set_mode", false));
    let sink = Arc::new(RecordingLogSink::new());
    let service = LifecycleService::new(Arc::clone(&transport), sink.clone());
    let mut ws = WaitSet::with_capacity(8);

    // Inactive: handled, one warning, transport untouched.
    assert!(service.add_to_wait_set(&mut ws));
    assert_eq!(sink.warnings(), 1);
    assert_eq!(transport.registrations(), 0);

    // Second poll in the same inactive period is silent.
    assert!(service.add_to_wait_set(&mut ws));
    assert_eq!(sink.warnings(), 1);

    // Active: transport result is returned as-is.
    service.on_activate();
    assert!(!service.add_to_wait_set(&mut ws));
    assert_eq!(transport.registrations(), 1);
    assert_eq!(sink.warnings(), 1);

    // Inactive again: exactly one new warning.
    service.on_deactivate();
    assert!(service.add_to_wait_set(&mut ws));
    assert!(service.add_to_wait_set(&mut ws));
    assert_eq!(sink.warnings(), 2);
    assert_eq!(transport.registrations(), 1);
}

#[test]
fn is_activated_tracks_last_call() {
    let service = LifecycleService::new(
        Arc::new(TransportService::new("/noop", true)),
        Arc::new(RecordingLogSink::new()),
    );

    let sequences: [&[bool]; 4] = [
        &[true, true],
        &[false, false],
        &[true, false, true],
        &[false, true, false, false],
    ];
    for sequence in sequences {
        for &activate in sequence {
            if activate {
                service.on_activate();
            } else {
                service.on_deactivate();
            }
        }
        assert_eq!(service.is_activated(), *sequence.last().unwrap());
    }
}

#[test]
fn concurrent_pollers_see_one_warning_per_inactive_period() {
    let transport = Arc::new(TransportService::new("/busy", true));
    let sink = Arc::new(RecordingLogSink::new());
    let service = Arc::new(LifecycleService::new(Arc::clone(&transport), sink.clone()));

    let pollers: Vec<_> = (0..4)
        .map(|_| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                let mut ws = WaitSet::with_capacity(1);
                for _ in 0..2_000 {
                    ws.clear();
                    assert!(service.add_to_wait_set(&mut ws));
                }
            })
        })
        .collect();
    for poller in pollers {
        poller.join().unwrap();
    }

    assert_eq!(sink.warnings(), 1);
    assert_eq!(transport.registrations(), 0);
}

#[test]
fn messages_survive_an_inactive_window() {
    let sink = Arc::new(RecordingLogSink::new());
    let config = IntraProcessConfig {
        history: CapacityPolicy::keep_last(3).unwrap(),
        buffer_type: BufferType::CallbackDefault,
    };
    let node = LifecycleNode::with_config("listener", sink.clone(), config).unwrap();
    let topic = IntraProcessTopic::new("/chatter");
    let guard = Arc::new(CountingGuardCondition::new());
    let sub = node
        .create_intra_process_subscription(&topic, false, guard.clone())
        .unwrap();
    let mut ws = WaitSet::with_capacity(4);

    for i in 0..5_u32 {
        topic.publish_owned(Box::new(i)).unwrap();
    }
    assert_eq!(guard.take_triggered(), 5);
    assert!(sub.add_to_wait_set(&mut ws));
    assert!(ws.is_empty());
    assert!(!sub.is_ready(&ws));
    assert_eq!(sink.warnings(), 1);

    node.on_activate();
    assert!(sub.add_to_wait_set(&mut ws));
    assert!(ws.contains("/chatter"));
    assert!(sub.is_ready(&ws));
    assert!(!sub.use_take_shared_method());

    let received: Vec<u32> = std::iter::from_fn(|| sub.consume_owned().ok())
        .map(|m| *m)
        .collect();
    assert_eq!(received, [2, 3, 4]);
    assert_eq!(sub.consume().unwrap_err().kind, ErrorKind::EmptyBuffer);
}

#[tokio::test]
async fn gated_publisher_over_topic_wakes_async_waiter() {
    let sink = Arc::new(RecordingLogSink::new());
    let node = LifecycleNode::new("relay", sink.clone()).unwrap();
    let topic = Arc::new(IntraProcessTopic::<String>::new("/relay"));
    let guard = Arc::new(NotifyGuardCondition::new());
    let sub = node
        .create_intra_process_subscription(&topic, true, guard.clone())
        .unwrap();
    let publisher = node.create_publisher::<String, _>("/relay", Arc::clone(&topic));

    assert!(!publisher.publish(&"dropped".to_string()).await.unwrap());
    assert_eq!(guard.trigger_count(), 0);

    let waiter = {
        let guard = Arc::clone(&guard);
        tokio::spawn(async move { guard.wait_triggered().await })
    };

    node.on_activate();
    assert!(publisher.publish(&"hello".to_string()).await.unwrap());

    tokio::time::timeout(Duration::from_millis(500), waiter)
        .await
        .expect("publish should wake the waiter")
        .unwrap();
    assert!(sub.use_take_shared_method());
    assert_eq!(*sub.consume_shared().unwrap(), "hello");
    assert_eq!(sink.warnings(), 1);
}
