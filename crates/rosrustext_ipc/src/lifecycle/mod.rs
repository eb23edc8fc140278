//! rosrustext_ipc::lifecycle
//!
//! Activation-gated endpoints (service, subscription, publisher) and the node that
//! fans activation out to them.
//!
//! Core gate semantics live in `rosrustext_ipc_core::lifecycle`.

/// Re-export core lifecycle types
pub use rosrustext_ipc_core::lifecycle::{ActivationGate, ManagedEntity};

// Transport seam + shared gating helper.
mod endpoint;
pub use endpoint::TransportEndpoint;

// Gated service.
mod service;
pub use service::LifecycleService;

// Gated subscription (any transport, plus intra-process accessors).
mod subscription;
pub use subscription::LifecycleSubscription;

// Gated publisher.
mod publisher;
pub use publisher::{LifecyclePublisher, PublishLike};

// Activation fan-out.
mod node;
pub use node::LifecycleNode;
