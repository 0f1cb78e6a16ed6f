//! Caplet - Opaque Compute Capsules for Embedding Runtimes
//!
//! A capsule bundles a signed integer payload with one of a fixed set of
//! behaviors ({Add, Multiply}), selected at construction and immutable
//! thereafter. The embedding host runtime never sees the capsule's layout:
//! it holds an unstructured numeric token and drives everything through the
//! op dispatch surface. The crate guarantees each capsule is reclaimed
//! exactly once, whether the host frees it explicitly or the table is torn
//! down with capsules still live.
//!
//! # Features
//!
//! - **Tagged-variant dispatch**: behaviors are a closed enum matched
//!   exhaustively, not stored function pointers
//! - **Never-reused tokens**: capsule IDs are monotonic, so a stale token is
//!   a checked error rather than an aliased hit
//! - **Exactly-once release**: finalizers are consumed on release; double
//!   free and use-after-free are unrepresentable
//! - **Host op surface**: ops registered by numeric ID over raw `u64`
//!   argument slots, with arity checked before dispatch
//! - **TOML configuration**: table budget and teardown warnings via
//!   `caplet.toml`
//!
//! # Example
//!
//! ```rust
//! use caplet::capsule::{Behavior, CapsuleTable};
//!
//! let mut table = CapsuleTable::new();
//!
//! let id = table.create(Behavior::Add, 5).unwrap();
//! assert_eq!(table.invoke(id, 3).unwrap(), 8);
//!
//! let contents = table.release(id).unwrap();
//! assert_eq!(contents.payload(), 5);
//!
//! // The token is dead now; further access is a checked error.
//! assert!(table.invoke(id, 3).is_err());
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   Host Runtime   │  Holds raw u64 tokens only
//! └────────┬─────────┘
//!          │ call(op_id, args, outputs)
//!          ▼
//! ┌──────────────────┐
//! │   HostRegistry   │  Op lookup + arity check
//! └────────┬─────────┘
//!          │ capsule_make / capsule_invoke / capsule_free
//!          ▼
//! ┌──────────────────┐
//! │   CapsuleTable   │  Owns live capsules, checked lookup,
//! └────────┬─────────┘  exactly-once release
//!          ▼
//! ┌──────────────────┐
//! │ CapsuleContents  │  { Behavior, payload } — immutable
//! └──────────────────┘
//! ```

#![warn(clippy::all)]

pub mod capsule;
pub mod config;
pub mod host;

// Re-export commonly used types
pub use capsule::{
    Behavior, CapsuleContents, CapsuleError, CapsuleId, CapsuleResult, CapsuleTable,
};
pub use config::{CapletConfig, ConfigError, ConfigResult, TableConfig};
pub use host::{op_ids, HostFn, HostRegistry, OpEntry, OpSignature};
