//! rosrustext_ipc
//!
//! Endpoint layer built on top of `rosrustext_ipc_core`.
//! Provides lifecycle-gated services, subscriptions and publishers plus
//! serialization-free intra-process delivery between them.
//!
//! Design rules:
//! - Application owns the poll loop and decides when to activate.
//! - No hidden threads.
//! - Diagnostics go through an injected `LogSink`, never a global logger.

pub mod config;
pub mod error;
pub mod intra_process;
pub mod lifecycle;
pub mod logging;
pub mod wait_set;

#[cfg(test)]
pub(crate) mod testing;

// Adapter error type
pub use error::{Error, Result};

// Re-export core types that endpoint users will commonly need
pub use rosrustext_ipc_core::error::CoreError;
pub use rosrustext_ipc_core::intra_process::{
    BufferType, CapacityPolicy, OwnedMessage, Ownership, OwnershipEnvelope, SharedMessage,
};
pub use rosrustext_ipc_core::wait_set::{WaitSet, WaitSetParticipant};
