// # State Store Trait
//
// Defines the interface for holding the latest connectivity snapshot.
//
// ## Purpose
//
// The store is the only shared mutable state in the bridge. Ingestion
// writes it; interface synthesis and default-route resolution read it.
//
// ## Guarantees
//
// - A snapshot wholly replaces the previous one (no merging)
// - Readers see either the fully-old or the fully-new snapshot
// - Nothing is persisted; a restart returns the store to Unset
//
// ## Usage
//
// ```rust
// use netbridge_core::{ConnectivitySnapshot, MemoryStateStore, StateStore};
//
// let store = MemoryStateStore::new();
// assert!(store.get()?.is_empty());
//
// store.set(ConnectivitySnapshot::default())?;
// assert_eq!(store.status()?.generation, 1);
// # Ok::<(), netbridge_core::Error>(())
// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::snapshot::ConnectivitySnapshot;

/// Bookkeeping about the snapshot currently held by a store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStatus {
    /// Number of snapshots committed so far (0 = Unset)
    pub generation: u64,
    /// When the current snapshot was committed
    pub applied_at: Option<DateTime<Utc>>,
}

impl StoreStatus {
    /// Whether no snapshot has ever been committed
    pub fn is_unset(&self) -> bool {
        self.generation == 0
    }
}

/// Trait for state store implementations
///
/// Implementations must be thread-safe: the underlying network stack
/// calls the readers from its own monitoring threads while the host calls
/// the writer from a callback thread.
///
/// # Contract
///
/// - `get` never blocks on anything but brief lock contention
/// - `set` is mutually exclusive with every other `get` and `set`
/// - The latest `set` wins; there is no queue
pub trait StateStore: Send + Sync {
    /// Get the current snapshot
    ///
    /// Returns the empty snapshot before the first `set`. The returned
    /// value is an immutable view that later `set` calls do not affect.
    fn get(&self) -> Result<Arc<ConnectivitySnapshot>, crate::Error>;

    /// Atomically replace the current snapshot
    ///
    /// # Returns
    ///
    /// - `Ok(u64)`: Generation number of the committed snapshot
    /// - `Err(Error)`: Store failure; the previous snapshot is kept
    fn set(&self, snapshot: ConnectivitySnapshot) -> Result<u64, crate::Error>;

    /// Get bookkeeping about the current snapshot
    fn status(&self) -> Result<StoreStatus, crate::Error>;
}
