//! The network bridge facade
//!
//! `NetworkBridge` owns one state store and wires the write path
//! ([`UpdateIngester`]) to the two read paths ([`InterfaceSynthesizer`],
//! [`DefaultRouteResolver`]).
//!
//! ## Architecture
//!
//! ```text
//!   host ── update_network_state ──▶ UpdateIngester ──▶ StateStore
//!                                          │                │
//!                                          ▼                ├──▶ InterfaceSynthesizer ──▶ interfaces()
//!                                    RouteMonitor           └──▶ DefaultRouteResolver ──▶ default_interface()
//! ```
//!
//! ## Lifecycle
//!
//! 1. Create with [`NetworkBridge::new()`] (or [`NetworkBridge::with_route_channel()`])
//! 2. Hand the bridge (as [`NetworkHooks`]) to the underlying stack
//! 3. Feed host payloads to [`NetworkBridge::update_network_state()`]
//!
//! The bridge starts Unset and becomes Populated on the first successful
//! update. There is no way back to Unset short of building a new bridge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::BridgeConfig;
use crate::error::Result;
use crate::fault::guard;
use crate::ingest::UpdateIngester;
use crate::interfaces::{Interface, InterfaceSynthesizer};
use crate::monitor::{ChannelRouteMonitor, RouteChangeStream};
use crate::route::DefaultRouteResolver;
use crate::state::MemoryStateStore;
use crate::traits::{DefaultRoute, NetworkHooks, RouteMonitor, StateStore};

/// Whether the host has reported anything yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeState {
    /// No snapshot ingested; queries return placeholders
    Unset,
    /// At least one snapshot ingested
    Populated,
}

/// Read-only summary of the bridge
///
/// Counters and snapshot fields are read separately and may straddle a
/// concurrent update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeStatus {
    /// Unset or Populated
    pub state: BridgeState,
    /// Number of snapshots committed
    pub generation: u64,
    /// When the current snapshot was committed
    pub applied_at: Option<DateTime<Utc>>,
    /// Interfaces in the current snapshot (before any placeholder)
    pub interface_count: usize,
    /// Default interface name in the current snapshot
    pub default_interface: String,
}

/// Bridge between a pushing host and a pulling network stack
#[derive(Clone)]
pub struct NetworkBridge {
    store: Arc<dyn StateStore>,
    config: Arc<BridgeConfig>,
    ingester: UpdateIngester,
    synthesizer: InterfaceSynthesizer,
    resolver: DefaultRouteResolver,
}

impl NetworkBridge {
    /// Create a bridge over a fresh in-memory store
    pub fn new(config: BridgeConfig) -> Result<Self> {
        Self::with_store(Arc::new(MemoryStateStore::new()), config)
    }

    /// Create a bridge over the given store
    pub fn with_store(store: Arc<dyn StateStore>, config: BridgeConfig) -> Result<Self> {
        config.validate()?;
        let config = Arc::new(config);

        Ok(Self {
            ingester: UpdateIngester::new(Arc::clone(&store)),
            synthesizer: InterfaceSynthesizer::new(Arc::clone(&store), Arc::clone(&config)),
            resolver: DefaultRouteResolver::new(Arc::clone(&store), Arc::clone(&config)),
            store,
            config,
        })
    }

    /// Create a bridge whose route changes arrive on a stream
    ///
    /// # Returns
    ///
    /// A tuple of (bridge, stream) where the stream yields a
    /// [`RouteChange`](crate::traits::RouteChange) for each committed
    /// snapshot that names a default interface
    pub fn with_route_channel(config: BridgeConfig) -> Result<(Self, RouteChangeStream)> {
        let (monitor, changes) = ChannelRouteMonitor::new(config.route_channel_capacity);
        let bridge = Self::new(config)?.with_route_monitor(Arc::new(monitor));
        Ok((bridge, changes))
    }

    /// Attach the route-change side channel
    pub fn with_route_monitor(mut self, monitor: Arc<dyn RouteMonitor>) -> Self {
        self.ingester = self.ingester.with_route_monitor(monitor);
        self
    }

    /// Ingest a host payload
    ///
    /// On error the previous snapshot stays in place.
    pub fn update_network_state(&self, payload: &str) -> Result<()> {
        self.ingester.apply(payload).map(|_| ())
    }

    /// List interfaces for the underlying stack
    pub fn get_interfaces(&self) -> Result<Vec<Interface>> {
        guard("get_interfaces", || self.synthesizer.list_interfaces())
    }

    /// Resolve the default route for the underlying stack
    pub fn get_default_interface(&self) -> Result<DefaultRoute> {
        guard("get_default_interface", || self.resolver.resolve_default())
    }

    /// Summarize the current state
    pub fn status(&self) -> Result<BridgeStatus> {
        guard("status", || {
            let status = self.store.status()?;
            let snapshot = self.store.get()?;
            Ok(BridgeStatus {
                state: if status.is_unset() {
                    BridgeState::Unset
                } else {
                    BridgeState::Populated
                },
                generation: status.generation,
                applied_at: status.applied_at,
                interface_count: snapshot.interfaces.len(),
                default_interface: snapshot.default_interface.clone(),
            })
        })
    }

    /// The validated configuration this bridge runs with
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }
}

impl NetworkHooks for NetworkBridge {
    fn interfaces(&self) -> Result<Vec<Interface>> {
        self.get_interfaces()
    }

    fn default_interface(&self) -> Result<DefaultRoute> {
        self.get_default_interface()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = BridgeConfig::default().with_route_channel_capacity(0);
        assert!(matches!(NetworkBridge::new(config), Err(Error::Config(_))));
    }

    #[test]
    fn test_status_tracks_state() {
        let bridge = NetworkBridge::new(BridgeConfig::default()).unwrap();

        let status = bridge.status().unwrap();
        assert_eq!(status.state, BridgeState::Unset);
        assert_eq!(status.generation, 0);
        assert_eq!(status.interface_count, 0);

        bridge
            .update_network_state(r#"{"Interfaces":[],"DefaultInterface":""}"#)
            .unwrap();

        let status = bridge.status().unwrap();
        assert_eq!(status.state, BridgeState::Populated);
        assert_eq!(status.generation, 1);
        assert!(status.applied_at.is_some());
    }

    #[test]
    fn test_hooks_delegate_to_bridge() {
        let bridge = NetworkBridge::new(BridgeConfig::default()).unwrap();
        let hooks: &dyn NetworkHooks = &bridge;

        assert_eq!(hooks.interfaces().unwrap(), bridge.get_interfaces().unwrap());
        assert_eq!(
            hooks.default_interface().unwrap(),
            bridge.get_default_interface().unwrap()
        );
    }

    #[test]
    fn test_status_serializes() {
        let bridge = NetworkBridge::new(BridgeConfig::default()).unwrap();
        let json = serde_json::to_value(bridge.status().unwrap()).unwrap();
        assert_eq!(json["state"], "unset");
        assert_eq!(json["generation"], 0);
    }
}
