//! Default route resolution
//!
//! Resolves the snapshot's named default interface to one address.
//!
//! ## Policy
//!
//! - No default interface named: the placeholder route (`dummy0`,
//!   `127.0.0.1`). The stack must not see "not known yet" as a failure
//!   during startup.
//! - Named and present: the first IPv4 address, else the first address of
//!   any family, else `DefaultInterfaceNoUsableAddress`.
//! - Named but absent: `DefaultInterfaceNotFound`, or the placeholder when
//!   configured with [`UnknownDefaultPolicy::Placeholder`].

use std::net::IpAddr;
use std::sync::Arc;
use tracing::debug;

use crate::config::{BridgeConfig, UnknownDefaultPolicy};
use crate::error::{Error, Result};
use crate::snapshot::{ConnectivitySnapshot, InterfaceRecord};
use crate::traits::{DefaultRoute, StateStore};

/// Resolves the default route from a [`StateStore`]
#[derive(Clone)]
pub struct DefaultRouteResolver {
    store: Arc<dyn StateStore>,
    config: Arc<BridgeConfig>,
}

impl DefaultRouteResolver {
    /// Create a new resolver reading from `store`
    pub fn new(store: Arc<dyn StateStore>, config: Arc<BridgeConfig>) -> Self {
        Self { store, config }
    }

    /// Resolve the default route for the current snapshot
    pub fn resolve_default(&self) -> Result<DefaultRoute> {
        let snapshot = self.store.get()?;
        self.resolve(&snapshot)
    }

    /// Resolve the default route for a given snapshot
    pub fn resolve(&self, snapshot: &ConnectivitySnapshot) -> Result<DefaultRoute> {
        if !snapshot.has_default_interface() {
            return Ok(self.placeholder());
        }

        let name = &snapshot.default_interface;
        let mut matched = false;

        // Duplicate names are tried in host order; the first record that
        // yields an address wins.
        for record in snapshot.interfaces_named(name) {
            matched = true;
            if let Some(address) = best_address(record) {
                return Ok(DefaultRoute::new(name.clone(), address));
            }
        }

        if matched {
            return Err(Error::DefaultInterfaceNoUsableAddress(name.clone()));
        }

        match self.config.unknown_default {
            UnknownDefaultPolicy::Fail => Err(Error::DefaultInterfaceNotFound(name.clone())),
            UnknownDefaultPolicy::Placeholder => {
                debug!("Default interface {} not in interface list, using placeholder", name);
                Ok(self.placeholder())
            }
        }
    }

    fn placeholder(&self) -> DefaultRoute {
        let fallback = &self.config.fallback;
        DefaultRoute::new(fallback.interface_name.clone(), fallback.address.addr())
    }
}

/// First IPv4 address of `record`, else its first address of any family
///
/// IPv4-mapped IPv6 addresses count as IPv4 and come back in IPv4 form.
fn best_address(record: &InterfaceRecord) -> Option<IpAddr> {
    let mut first_any = None;
    for net in record.parsed_addrs() {
        let addr = net.addr().to_canonical();
        if addr.is_ipv4() {
            return Some(addr);
        }
        first_any.get_or_insert(addr);
    }
    first_any
}
