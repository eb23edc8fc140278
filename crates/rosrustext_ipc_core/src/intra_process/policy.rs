use std::num::NonZeroUsize;

use crate::error::{CoreError, Domain, ErrorKind, Result};

use super::Ownership;

/// History depth of an intra-process buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CapacityPolicy {
    /// Keep every message until consumed.
    Unbounded,
    /// Keep at most N messages; the oldest is evicted on overflow.
    KeepLast(NonZeroUsize),
}

impl CapacityPolicy {
    /// Keep-last with validation: a zero depth cannot hold anything and is rejected.
    pub fn keep_last(depth: usize) -> Result<Self> {
        NonZeroUsize::new(depth)
            .map(CapacityPolicy::KeepLast)
            .ok_or_else(|| {
                CoreError::error()
                    .domain(Domain::Config)
                    .kind(ErrorKind::InvalidArgument)
                    .msg("intra-process delivery requires a history depth greater than zero")
                    .build()
            })
    }

    pub fn capacity(self) -> Option<usize> {
        match self {
            CapacityPolicy::Unbounded => None,
            CapacityPolicy::KeepLast(depth) => Some(depth.get()),
        }
    }
}

/// How a subscription wants its buffer to store messages.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum BufferType {
    SharedPtr,
    UniquePtr,
    /// Follow whatever the subscription callback consumes.
    #[default]
    CallbackDefault,
}

impl BufferType {
    /// Static take mode for a buffer, fixed at construction.
    pub const fn resolve(self, callback_prefers_shared: bool) -> Ownership {
        match self {
            BufferType::SharedPtr => Ownership::Shared,
            BufferType::UniquePtr => Ownership::Owned,
            BufferType::CallbackDefault if callback_prefers_shared => Ownership::Shared,
            BufferType::CallbackDefault => Ownership::Owned,
        }
    }
}
