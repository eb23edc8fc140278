use std::sync::Arc;

use crate::error::{CoreError, Result};

/// Read-only message shared between any number of consumers.
pub type SharedMessage<M> = Arc<M>;

/// Exclusively owned message; moving it out transfers ownership.
pub type OwnedMessage<M> = Box<M>;

/// Which ownership discipline a slot holds, or a consumer prefers.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Ownership {
    Shared,
    Owned,
}

impl Ownership {
    pub const fn label(self) -> &'static str {
        match self {
            Ownership::Shared => "shared",
            Ownership::Owned => "owned",
        }
    }
}

/// One buffered message in either ownership form.
///
/// Retrieval must match the stored variant (`take_shared` / `take_owned`);
/// `into_shared` / `into_owned` convert when the consumer accepts the cost.
#[derive(Debug)]
pub enum OwnershipEnvelope<M> {
    Shared(SharedMessage<M>),
    Owned(OwnedMessage<M>),
}

impl<M> OwnershipEnvelope<M> {
    pub fn store_shared(message: SharedMessage<M>) -> Self {
        OwnershipEnvelope::Shared(message)
    }

    /// Takes the box by value; the producer keeps no handle.
    pub fn store_owned(message: OwnedMessage<M>) -> Self {
        OwnershipEnvelope::Owned(message)
    }

    pub fn ownership(&self) -> Ownership {
        match self {
            OwnershipEnvelope::Shared(_) => Ownership::Shared,
            OwnershipEnvelope::Owned(_) => Ownership::Owned,
        }
    }

    /// Borrow the payload regardless of ownership form.
    pub fn message(&self) -> &M {
        match self {
            OwnershipEnvelope::Shared(m) => &**m,
            OwnershipEnvelope::Owned(m) => &**m,
        }
    }

    /// Strict accessor; a mismatch drops the envelope. Check `ownership()` first,
    /// or use `IntraProcessBuffer::take_shared`, which leaves the entry queued.
    pub fn take_shared(self) -> Result<SharedMessage<M>> {
        match self {
            OwnershipEnvelope::Shared(m) => Ok(m),
            OwnershipEnvelope::Owned(_) => Err(CoreError::type_mismatch(
                Ownership::Shared.label(),
                Ownership::Owned.label(),
            )),
        }
    }

    /// Strict accessor; see `take_shared`.
    pub fn take_owned(self) -> Result<OwnedMessage<M>> {
        match self {
            OwnershipEnvelope::Owned(m) => Ok(m),
            OwnershipEnvelope::Shared(_) => Err(CoreError::type_mismatch(
                Ownership::Owned.label(),
                Ownership::Shared.label(),
            )),
        }
    }

    /// Shared form of either variant. An owned payload is moved, never cloned.
    pub fn into_shared(self) -> SharedMessage<M> {
        match self {
            OwnershipEnvelope::Shared(m) => m,
            OwnershipEnvelope::Owned(m) => Arc::from(m),
        }
    }
}

impl<M: Clone> OwnershipEnvelope<M> {
    /// Owned form of either variant. A shared payload is copied unless this is its last holder.
    pub fn into_owned(self) -> OwnedMessage<M> {
        match self {
            OwnershipEnvelope::Owned(m) => m,
            OwnershipEnvelope::Shared(m) => match Arc::try_unwrap(m) {
                Ok(inner) => Box::new(inner),
                Err(shared) => Box::new((*shared).clone()),
            },
        }
    }
}

impl<M> From<SharedMessage<M>> for OwnershipEnvelope<M> {
    fn from(message: SharedMessage<M>) -> Self {
        OwnershipEnvelope::store_shared(message)
    }
}

impl<M> From<OwnedMessage<M>> for OwnershipEnvelope<M> {
    fn from(message: OwnedMessage<M>) -> Self {
        OwnershipEnvelope::store_owned(message)
    }
}
