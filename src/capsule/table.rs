//! Owning table of live capsules.
//!
//! The table is both the factory and the registry: `create` allocates the
//! contents and installs them behind a fresh token in one step, so no raw
//! reference to the contents ever escapes. Tokens are monotonically
//! allocated and never reused; lookups on released or fabricated tokens are
//! checked errors.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use super::contents::{Behavior, CapsuleContents};
use super::{CapsuleError, CapsuleResult};
use crate::config::TableConfig;

/// Default live-capsule budget.
pub const DEFAULT_MAX_CAPSULES: usize = 8192;

/// Opaque token referencing a capsule in a [`CapsuleTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CapsuleId(u64);

impl CapsuleId {
    /// Rehydrate a token from its raw transport value.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw numeric value handed across the host boundary.
    pub fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CapsuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Release routine run exactly once with the reclaimed contents.
pub type Finalizer = Box<dyn FnOnce(CapsuleContents) + Send>;

struct CapsuleEntry {
    contents: CapsuleContents,
    finalizer: Option<Finalizer>,
}

impl CapsuleEntry {
    /// Run the finalizer (if any) and hand back the contents. Consumes the
    /// entry, so a second reclamation of the same capsule cannot happen.
    fn reclaim(mut self) -> CapsuleContents {
        let contents = self.contents;
        if let Some(finalizer) = self.finalizer.take() {
            finalizer(contents);
        }
        contents
    }
}

/// Owning registry of live capsules.
pub struct CapsuleTable {
    entries: HashMap<u64, CapsuleEntry>,
    /// Next token value; monotonic, never reused
    next_id: u64,
    limit: usize,
    warn_on_teardown: bool,
}

impl CapsuleTable {
    /// Create a table with the default budget.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_MAX_CAPSULES)
    }

    /// Create a table bounding the number of simultaneously live capsules.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: HashMap::new(),
            next_id: 1,
            limit,
            warn_on_teardown: true,
        }
    }

    /// Create a table from a `[table]` configuration section.
    pub fn from_config(config: &TableConfig) -> Self {
        Self {
            entries: HashMap::new(),
            next_id: 1,
            limit: config.max_capsules,
            warn_on_teardown: config.warn_on_teardown,
        }
    }

    fn allocate_id(&mut self) -> CapsuleId {
        let id = self.next_id;
        self.next_id += 1;
        CapsuleId(id)
    }

    /// Construct a capsule and return its token.
    ///
    /// Fails with [`CapsuleError::Exhausted`] when the live-capsule budget
    /// is reached; nothing is allocated in that case.
    pub fn create(&mut self, behavior: Behavior, payload: i64) -> CapsuleResult<CapsuleId> {
        self.install(CapsuleContents::new(behavior, payload), None)
    }

    /// Construct a capsule with a release routine.
    ///
    /// The finalizer runs exactly once with the reclaimed contents, either
    /// on explicit [`release`](Self::release) or when the table is dropped.
    pub fn create_with_finalizer(
        &mut self,
        behavior: Behavior,
        payload: i64,
        finalizer: Finalizer,
    ) -> CapsuleResult<CapsuleId> {
        self.install(CapsuleContents::new(behavior, payload), Some(finalizer))
    }

    /// Construct a capsule from a raw host selector.
    ///
    /// Fails with [`CapsuleError::InvalidSelector`] for selectors outside
    /// the recognized set.
    pub fn create_from_raw(&mut self, selector: u32, payload: i64) -> CapsuleResult<CapsuleId> {
        self.install(CapsuleContents::from_raw(selector, payload)?, None)
    }

    fn install(
        &mut self,
        contents: CapsuleContents,
        finalizer: Option<Finalizer>,
    ) -> CapsuleResult<CapsuleId> {
        if self.entries.len() >= self.limit {
            return Err(CapsuleError::Exhausted { limit: self.limit });
        }

        let id = self.allocate_id();
        self.entries.insert(
            id.as_raw(),
            CapsuleEntry {
                contents,
                finalizer,
            },
        );

        debug!(capsule = %id, behavior = %contents.behavior(), "capsule created");
        Ok(id)
    }

    /// Dispatch to the capsule's bound behavior.
    pub fn invoke(&self, id: CapsuleId, arg: i64) -> CapsuleResult<i64> {
        let entry = self
            .entries
            .get(&id.as_raw())
            .ok_or(CapsuleError::UnknownCapsule(id))?;
        Ok(entry.contents.invoke(arg))
    }

    /// Release a capsule, running its finalizer and returning the contents.
    ///
    /// The token is dead afterwards; a second release or any later invoke
    /// fails with [`CapsuleError::UnknownCapsule`].
    pub fn release(&mut self, id: CapsuleId) -> CapsuleResult<CapsuleContents> {
        let entry = self
            .entries
            .remove(&id.as_raw())
            .ok_or(CapsuleError::UnknownCapsule(id))?;

        debug!(capsule = %id, "capsule released");
        Ok(entry.reclaim())
    }

    /// Check whether a token refers to a live capsule.
    pub fn contains(&self, id: CapsuleId) -> bool {
        self.entries.contains_key(&id.as_raw())
    }

    /// Number of live capsules.
    pub fn live_count(&self) -> usize {
        self.entries.len()
    }

    /// The live-capsule budget.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for CapsuleTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CapsuleTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapsuleTable")
            .field("live", &self.entries.len())
            .field("next_id", &self.next_id)
            .field("limit", &self.limit)
            .finish()
    }
}

impl Drop for CapsuleTable {
    /// Teardown releases every remaining capsule, running each pending
    /// finalizer exactly once.
    fn drop(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        if self.warn_on_teardown {
            warn!(
                live = self.entries.len(),
                "capsule table dropped with live capsules"
            );
        }
        for (_, entry) in self.entries.drain() {
            entry.reclaim();
        }
    }
}
