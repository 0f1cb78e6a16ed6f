//! Host Op Surface
//!
//! The dispatch layer an embedding runtime drives. The host never touches a
//! capsule directly: it calls ops by numeric ID with raw `u64` argument and
//! output slots, and the ops interpret tokens against the registry's owned
//! [`CapsuleTable`].
//!
//! ```text
//! Host issues: call(CAPSULE_MAKE, [selector, payload], outputs)
//!                      │
//!                      ▼
//! HostRegistry (op lookup + arity check)
//!                      │
//!                      ▼
//! CapsuleTable (create / invoke / release)
//! ```

mod ops;

pub use ops::register_capsule_ops;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::capsule::{CapsuleError, CapsuleResult, CapsuleTable};

/// Op function signature: (table, args, outputs) -> Result<return_value, error>
pub type HostFn =
    Arc<dyn Fn(&mut CapsuleTable, &[u64], &mut [u64]) -> CapsuleResult<i64> + Send + Sync>;

/// Op signature metadata.
#[derive(Debug, Clone)]
pub struct OpSignature {
    pub name: String,
    pub description: String,
    pub arg_count: usize,
    pub has_return: bool,
}

/// A registered op entry.
pub struct OpEntry {
    pub id: u32,
    pub signature: OpSignature,
    pub func: HostFn,
}

impl fmt::Debug for OpEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpEntry")
            .field("id", &self.id)
            .field("signature", &self.signature)
            .finish()
    }
}

/// Fixed op IDs, part of the host contract.
pub mod op_ids {
    pub const CAPSULE_MAKE: u32 = 1;
    pub const CAPSULE_INVOKE: u32 = 2;
    pub const CAPSULE_FREE: u32 = 3;
    pub const CAPSULE_LIVE_COUNT: u32 = 4;
}

/// Registry of host-callable ops, owning the capsule table they act on.
pub struct HostRegistry {
    by_id: HashMap<u32, OpEntry>,
    by_name: HashMap<String, u32>,
    table: CapsuleTable,
}

impl HostRegistry {
    /// Create a registry with the capsule ops registered and a default table.
    pub fn new() -> Self {
        Self::with_table(CapsuleTable::new())
    }

    /// Create a registry around a preconfigured table.
    pub fn with_table(table: CapsuleTable) -> Self {
        let mut registry = Self {
            by_id: HashMap::new(),
            by_name: HashMap::new(),
            table,
        };
        register_capsule_ops(&mut registry);
        registry
    }

    /// Register an op with a specific ID.
    pub fn register_with_id(
        &mut self,
        id: u32,
        name: &str,
        description: &str,
        arg_count: usize,
        has_return: bool,
        func: HostFn,
    ) {
        let signature = OpSignature {
            name: name.to_string(),
            description: description.to_string(),
            arg_count,
            has_return,
        };

        self.by_name.insert(name.to_string(), id);
        self.by_id.insert(
            id,
            OpEntry {
                id,
                signature,
                func,
            },
        );
    }

    pub fn get(&self, id: u32) -> Option<&OpEntry> {
        self.by_id.get(&id)
    }

    pub fn get_id(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<&OpEntry> {
        self.by_name.get(name).and_then(|id| self.by_id.get(id))
    }

    pub fn list(&self) -> Vec<&OpEntry> {
        self.by_id.values().collect()
    }

    /// The table this registry dispatches against.
    pub fn table(&self) -> &CapsuleTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut CapsuleTable {
        &mut self.table
    }

    /// Call an op by ID.
    ///
    /// Checks existence and arity before dispatching. `outputs` must have at
    /// least one slot for ops that produce a value.
    pub fn call(&mut self, id: u32, args: &[u64], outputs: &mut [u64]) -> CapsuleResult<i64> {
        let (expected, func) = match self.by_id.get(&id) {
            Some(entry) => (entry.signature.arg_count, Arc::clone(&entry.func)),
            None => return Err(CapsuleError::UnknownOp(id)),
        };

        if args.len() < expected {
            return Err(CapsuleError::InvalidArgCount {
                expected,
                got: args.len(),
            });
        }

        func(&mut self.table, args, outputs)
    }
}

impl Default for HostRegistry {
    fn default() -> Self {
        Self::new()
    }
}
