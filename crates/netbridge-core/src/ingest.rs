//! Snapshot ingestion
//!
//! The write path of the bridge:
//!
//! ```text
//! payload ──parse──▶ ConnectivitySnapshot ──set──▶ StateStore
//!                                                     │
//!                           default interface named? ─┴─▶ RouteMonitor
//! ```
//!
//! ## Guarantees
//!
//! - A payload that fails to parse leaves the store untouched
//! - A committed snapshot stays committed whatever the route monitor does
//! - A panic anywhere on this path comes back as `Error::FaultRecovered`

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::fault::{guard, panic_message};
use crate::snapshot::ConnectivitySnapshot;
use crate::traits::{RouteChange, RouteMonitor, StateStore};

/// Validates host payloads and commits them to a [`StateStore`]
#[derive(Clone)]
pub struct UpdateIngester {
    store: Arc<dyn StateStore>,
    monitor: Option<Arc<dyn RouteMonitor>>,
}

impl UpdateIngester {
    /// Create an ingester with no route monitor attached
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self {
            store,
            monitor: None,
        }
    }

    /// Attach the route-change side channel
    pub fn with_route_monitor(mut self, monitor: Arc<dyn RouteMonitor>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    /// Parse `payload` and make it the current snapshot
    ///
    /// # Returns
    ///
    /// - `Ok(u64)`: Store generation of the committed snapshot
    /// - `Err(Error::Parse)`: Malformed payload; store unchanged
    /// - `Err(Error::FaultRecovered)`: Internal fault caught
    pub fn apply(&self, payload: &str) -> Result<u64> {
        guard("update_network_state", || self.apply_unguarded(payload))
    }

    fn apply_unguarded(&self, payload: &str) -> Result<u64> {
        let snapshot = match ConnectivitySnapshot::from_payload(payload) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Failed to parse network state: {}", e);
                return Err(e);
            }
        };

        info!(
            "Received network update: default={}, interfaces={}",
            snapshot.default_interface,
            snapshot.interfaces.len()
        );

        let default_interface = snapshot.default_interface.clone();
        let generation = self.store.set(snapshot)?;

        if !default_interface.is_empty() {
            self.notify(RouteChange::new(default_interface, generation));
        }

        Ok(generation)
    }

    // Fire-and-forget: nothing here may fail the already-committed update.
    fn notify(&self, change: RouteChange) {
        let Some(monitor) = &self.monitor else {
            return;
        };

        match catch_unwind(AssertUnwindSafe(|| monitor.default_route_changed(&change))) {
            Ok(Ok(())) => debug!("Notified route change: {}", change.interface),
            Ok(Err(e)) => warn!("Route change notification for {} failed: {}", change.interface, e),
            Err(payload) => error!(
                "Route monitor panicked on {}: {}",
                change.interface,
                panic_message(payload.as_ref())
            ),
        }
    }
}
