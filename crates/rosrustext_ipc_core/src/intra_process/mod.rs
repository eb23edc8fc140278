//! rosrustext_ipc_core::intra_process
//!
//! Serialization-free delivery between a publisher and a subscription in the same process.
//!
//! Key ideas:
//! - `OwnershipEnvelope` is the single slot type: shared (`Arc`) or owned (`Box`)
//! - `IntraProcessBuffer` is written once over the envelope and dispatches on its tag
//! - storage is pluggable through `AllocationStrategy`, chosen at construction
//! - signalling waiters is the owning subscription's job, not the buffer's

mod allocation;
mod buffer;
mod envelope;
mod policy;

pub use allocation::{AllocationStrategy, HeapAllocation, SlotPool, PREALLOCATE_MAX};
pub use buffer::IntraProcessBuffer;
pub use envelope::{OwnedMessage, Ownership, OwnershipEnvelope, SharedMessage};
pub use policy::{BufferType, CapacityPolicy};
