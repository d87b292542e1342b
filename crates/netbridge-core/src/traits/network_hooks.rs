// # Network Hooks Trait
//
// The two queries an underlying network stack registers in place of its
// OS lookups: "list interfaces" and "which interface is the default route".
//
// The stack calls these whenever it wants: at startup, on periodic
// re-polling and after a route-change notification. Both are synchronous
// and complete immediately; retry and backoff belong to the caller.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::interfaces::Interface;

/// The resolved default route
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DefaultRoute {
    /// Interface name
    pub name: String,
    /// Best address on that interface (IPv4 preferred)
    pub address: IpAddr,
}

impl DefaultRoute {
    /// Create a new default route
    pub fn new(name: impl Into<String>, address: IpAddr) -> Self {
        Self {
            name: name.into(),
            address,
        }
    }
}

/// Query surface consumed by the underlying network stack
pub trait NetworkHooks: Send + Sync {
    /// List interfaces in the shape of an OS interface enumeration
    ///
    /// Never returns an empty list.
    fn interfaces(&self) -> Result<Vec<Interface>, crate::Error>;

    /// Resolve the default interface and its best address
    ///
    /// # Returns
    ///
    /// - `Ok(DefaultRoute)`: Resolved route, or the placeholder while unknown
    /// - `Err(Error::DefaultInterfaceNotFound)`: Name matches no interface
    /// - `Err(Error::DefaultInterfaceNoUsableAddress)`: No address parses
    fn default_interface(&self) -> Result<DefaultRoute, crate::Error>;
}
