//! Capsule Core
//!
//! Opaque compute capsules: an immutable payload bound to one of a closed
//! set of behaviors, owned by a table that hands the host nothing but a
//! numeric token.
//!
//! # Lifecycle
//!
//! ```text
//! create ──► Live ──► invoke (any number of times)
//!              │
//!              ▼
//!           release ──► Released (terminal, token never reused)
//! ```
//!
//! A released or fabricated token always fails lookup with
//! [`CapsuleError::UnknownCapsule`]; tokens are never recycled, so a stale
//! token cannot alias a newer capsule.

mod contents;
mod table;

pub use contents::{Behavior, CapsuleContents};
pub use table::{CapsuleId, CapsuleTable, Finalizer, DEFAULT_MAX_CAPSULES};

use thiserror::Error;

/// Error type for capsule operations.
#[derive(Debug, Error)]
pub enum CapsuleError {
    /// Behavior selector outside the recognized set
    #[error("unrecognized behavior selector {0}, expected 1 (add) or 2 (multiply)")]
    InvalidSelector(u32),

    /// Token was never issued or has already been released
    #[error("unknown capsule {0}")]
    UnknownCapsule(CapsuleId),

    /// Live-capsule budget reached
    #[error("capsule table exhausted, limit {limit}")]
    Exhausted { limit: usize },

    /// Host op ID not registered
    #[error("unknown op {0}")]
    UnknownOp(u32),

    /// Host op called with too few arguments
    #[error("expected {expected} arguments, got {got}")]
    InvalidArgCount { expected: usize, got: usize },
}

/// Result type for capsule operations.
pub type CapsuleResult<T> = Result<T, CapsuleError>;
