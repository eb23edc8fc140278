use std::borrow::Cow;
use std::collections::TryReserveError;
use std::fmt;
use thiserror::Error;

/// Convenient result alias for rosrustext_ipc_core.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Log/handling importance. Maps onto logging levels in the adapter layer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

/// Where an error came from (helps triage and routing).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Domain {
    Lifecycle,
    IntraProcess,
    WaitSet,
    Config,
    Other,
}

/// Stable error "kind" for matching/branching.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ErrorKind {
    /// Wrong ownership accessor used on a stored message.
    TypeMismatch,
    /// Consume called on a buffer with no data.
    EmptyBuffer,
    /// Allocation or pool exhaustion while storing a message.
    ResourceExhaustion,
    /// A fixed-size registration table (wait set) is full.
    CapacityExceeded,
    InvalidArgument,
    Other,
}

/// How a caller is expected to react to an error kind.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ErrorClass {
    /// Logic bug at the call site. Never retried.
    ContractViolation,
    /// Fatal for the failing operation, propagated as-is.
    ResourceExhaustion,
    /// Rejected input at construction/configuration time.
    Configuration,
    Other,
}

impl ErrorKind {
    pub const fn class(self) -> ErrorClass {
        match self {
            ErrorKind::TypeMismatch | ErrorKind::EmptyBuffer => ErrorClass::ContractViolation,
            ErrorKind::ResourceExhaustion | ErrorKind::CapacityExceeded => {
                ErrorClass::ResourceExhaustion
            }
            ErrorKind::InvalidArgument => ErrorClass::Configuration,
            ErrorKind::Other => ErrorClass::Other,
        }
    }
}

/// Optional structured payload for rich context without forcing allocation.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Payload {
    None,

    /// Generic key/value context.
    Context {
        key: &'static str,
        value: Cow<'static, str>,
    },

    /// Ownership accessor mismatch.
    Ownership {
        expected: &'static str,
        found: &'static str,
    },

    /// Occupancy at the moment a bounded resource refused an entry.
    Occupancy { occupied: usize, limit: usize },
}

/// The one error type that crosses module boundaries in rosrustext_ipc_core.
#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("{severity:?}: {message}")]
pub struct CoreError {
    pub domain: Domain,
    pub kind: ErrorKind,
    pub severity: Severity,
    pub message: Cow<'static, str>,
    pub payload: Payload,
}

impl CoreError {
    /// Reaction class of this error.
    pub fn class(&self) -> ErrorClass {
        self.kind.class()
    }

    // ---------------- Fluent entry points ----------------

    #[inline]
    pub fn warn() -> ErrB {
        ErrB::new(Severity::Warn)
    }
    #[inline]
    pub fn error() -> ErrB {
        ErrB::new(Severity::Error)
    }
    #[inline]
    pub fn fatal() -> ErrB {
        ErrB::new(Severity::Fatal)
    }

    /// A message was taken with the accessor that does not match its stored ownership.
    pub fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        CoreError::error()
            .domain(Domain::IntraProcess)
            .kind(ErrorKind::TypeMismatch)
            .msgf(format_args!(
                "ownership mismatch: requested {expected} message, slot holds {found}"
            ))
            .payload(Payload::Ownership { expected, found })
            .build()
    }

    /// Consume on a buffer that has no data.
    pub fn empty_buffer(name: impl Into<Cow<'static, str>>) -> Self {
        CoreError::error()
            .domain(Domain::IntraProcess)
            .kind(ErrorKind::EmptyBuffer)
            .msg("consume called on an empty intra-process buffer")
            .payload(Payload::Context {
                key: "buffer",
                value: name.into(),
            })
            .build()
    }

    /// Storage for a message could not be obtained.
    pub fn resource_exhausted(occupied: usize, limit: usize) -> Self {
        CoreError::fatal()
            .domain(Domain::IntraProcess)
            .kind(ErrorKind::ResourceExhaustion)
            .msgf(format_args!(
                "no storage left for message ({occupied} of {limit} slots in use)"
            ))
            .payload(Payload::Occupancy { occupied, limit })
            .build()
    }
}

/// Fluent builder that behaves like iterator chains (takes self, returns Self).
/// Defaults:
/// - domain = Other
/// - kind = Other
/// - message = ""
/// - payload = None
#[derive(Debug, Clone)]
pub struct ErrB {
    domain: Domain,
    kind: ErrorKind,
    severity: Severity,
    message: Cow<'static, str>,
    payload: Payload,
}

impl ErrB {
    #[inline]
    fn new(severity: Severity) -> Self {
        Self {
            domain: Domain::Other,
            kind: ErrorKind::Other,
            severity,
            message: Cow::Borrowed(""),
            payload: Payload::None,
        }
    }

    /// Set/override the domain (defaults to Domain::Other).
    #[inline]
    pub fn domain(mut self, d: Domain) -> Self {
        self.domain = d;
        self
    }

    /// Set/override the kind (defaults to ErrorKind::Other).
    #[inline]
    pub fn kind(mut self, k: ErrorKind) -> Self {
        self.kind = k;
        self
    }

    /// Set/override the message (defaults to "").
    #[inline]
    pub fn msg(mut self, m: impl Into<Cow<'static, str>>) -> Self {
        self.message = m.into();
        self
    }

    /// Formatting-friendly message setter.
    #[inline]
    pub fn msgf(mut self, args: fmt::Arguments<'_>) -> Self {
        self.message = Cow::Owned(args.to_string());
        self
    }

    /// Only one payload: this replaces any previous payload (default is None).
    #[inline]
    pub fn payload(mut self, p: Payload) -> Self {
        self.payload = p;
        self
    }

    #[inline]
    pub fn build(self) -> CoreError {
        CoreError {
            domain: self.domain,
            kind: self.kind,
            severity: self.severity,
            message: self.message,
            payload: self.payload,
        }
    }
}

impl From<ErrB> for CoreError {
    fn from(b: ErrB) -> Self {
        b.build()
    }
}

impl From<TryReserveError> for CoreError {
    fn from(e: TryReserveError) -> Self {
        CoreError::fatal()
            .domain(Domain::IntraProcess)
            .kind(ErrorKind::ResourceExhaustion)
            .msg("allocation failed while storing message")
            .payload(Payload::Context {
                key: "alloc",
                value: e.to_string().into(),
            })
            .build()
    }
}
