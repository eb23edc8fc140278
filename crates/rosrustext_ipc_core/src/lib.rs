//! rosrustext_ipc_core: transport-agnostic building blocks for lifecycle-gated endpoints.
//!
//! Design goals:
//! - Pure, testable logic (no transport, no logging backend).
//! - Explicit types; no macro wizardry.
//! - Small, stable public API surface.

pub mod error;

/// Activation gate + managed-entity capability.
pub mod lifecycle;

/// Intra-process buffering with shared/owned message ownership.
pub mod intra_process;

/// Wait-set registration contract and guard conditions.
pub mod wait_set;
