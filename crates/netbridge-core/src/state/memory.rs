// # Memory State Store
//
// In-memory implementation of StateStore.
//
// ## Layout
//
// The current snapshot sits behind an `Arc` inside a `RwLock`. Readers
// clone the `Arc` under the read lock and release it immediately, so a
// long interface synthesis never holds up the writer, and a writer swap
// never changes a snapshot a reader is still looking at.
//
// ## Crash Behavior
//
// - All state is lost on restart
// - The first query after restart sees the Unset placeholders again

use chrono::{DateTime, Utc};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::snapshot::ConnectivitySnapshot;
use crate::traits::state_store::{StateStore, StoreStatus};
use crate::Error;

#[derive(Debug, Default)]
struct Current {
    snapshot: Arc<ConnectivitySnapshot>,
    generation: u64,
    applied_at: Option<DateTime<Utc>>,
}

/// In-memory state store implementation
///
/// Cloning the store yields another handle to the same state.
///
/// # Example
///
/// ```rust
/// use netbridge_core::{ConnectivitySnapshot, InterfaceRecord, MemoryStateStore, StateStore};
///
/// let store = MemoryStateStore::new();
/// let snapshot = ConnectivitySnapshot {
///     interfaces: vec![InterfaceRecord::new("wlan0", 1500)],
///     default_interface: "wlan0".to_string(),
/// };
///
/// store.set(snapshot.clone()).unwrap();
/// assert_eq!(*store.get().unwrap(), snapshot);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
    inner: Arc<RwLock<Current>>,
}

impl MemoryStateStore {
    /// Create a new, Unset memory state store
    pub fn new() -> Self {
        Self::default()
    }

    // The guarded value is only ever replaced field by field inside a
    // single write section that cannot panic, so a poisoned lock still
    // holds a consistent snapshot.
    fn read(&self) -> RwLockReadGuard<'_, Current> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Current> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self) -> Result<Arc<ConnectivitySnapshot>, Error> {
        Ok(Arc::clone(&self.read().snapshot))
    }

    fn set(&self, snapshot: ConnectivitySnapshot) -> Result<u64, Error> {
        let snapshot = Arc::new(snapshot);
        let applied_at = Utc::now();

        let mut guard = self.write();
        let generation = guard.generation.saturating_add(1);
        guard.snapshot = snapshot;
        guard.generation = generation;
        guard.applied_at = Some(applied_at);
        Ok(generation)
    }

    fn status(&self) -> Result<StoreStatus, Error> {
        let guard = self.read();
        Ok(StoreStatus {
            generation: guard.generation,
            applied_at: guard.applied_at,
        })
    }
}
