// # Route Monitor Trait
//
// The side channel through which the bridge tells the underlying stack that
// its default route may have changed.
//
// The stack caches its default-route decision and only recomputes it when
// told to, so pulling through `NetworkHooks` alone is not prompt enough.
// The bridge calls `default_route_changed` after every committed snapshot
// that names a default interface.
//
// ## Isolation
//
// Notifications are fire-and-forget. The bridge logs an `Err` (or a panic)
// from this trait and carries on; the snapshot is already committed at that
// point and stays committed.

use serde::{Deserialize, Serialize};

/// A default-route change notification
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteChange {
    /// Interface the host now routes through
    pub interface: String,
    /// Store generation of the snapshot that triggered this notification
    pub generation: u64,
}

impl RouteChange {
    /// Create a new route change notification
    pub fn new(interface: impl Into<String>, generation: u64) -> Self {
        Self {
            interface: interface.into(),
            generation,
        }
    }
}

/// Trait for route-change listeners
///
/// Implementations must not block: they are called synchronously on the
/// host's ingestion thread.
pub trait RouteMonitor: Send + Sync {
    /// Notify that the default route may now go through `change.interface`
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Notification delivered (or queued)
    /// - `Err(Error)`: Delivery failed; the bridge logs and ignores it
    fn default_route_changed(&self, change: &RouteChange) -> Result<(), crate::Error>;
}
