// # Host-Side Snapshot Builder
//
// Helpers for hosts that produce the ingestion payload from their own
// connectivity callbacks.
//
// Mobile platforms report link addresses as a host string plus a prefix
// length, and IPv6 link-local host strings often carry a scope suffix
// ("fe80::1%wlan0") that CIDR parsing rejects. `HostInterface` turns those
// into clean CIDR strings; `SnapshotBuilder` assembles and encodes the
// snapshot.
//
// ## Usage
//
// ```rust
// use netbridge_core::host::{HostInterface, SnapshotBuilder};
//
// let payload = SnapshotBuilder::new()
//     .interface(
//         HostInterface::new("wlan0", None)
//             .link_address("192.168.1.5", 24)?
//             .link_address("fe80::1%wlan0", 64)?,
//     )
//     .default_interface("wlan0")
//     .to_payload()?;
// # Ok::<(), netbridge_core::Error>(())
// ```

use std::net::IpAddr;
use tracing::debug;

use crate::error::{Error, Result};
use crate::snapshot::{ConnectivitySnapshot, InterfaceRecord};

/// MTU reported when the host cannot read the real one
pub const DEFAULT_MTU: u32 = 1500;

/// One interface as seen by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInterface {
    record: InterfaceRecord,
}

impl HostInterface {
    /// Create an interface; `mtu = None` falls back to [`DEFAULT_MTU`]
    pub fn new(name: impl Into<String>, mtu: Option<u32>) -> Self {
        Self {
            record: InterfaceRecord::new(name, mtu.unwrap_or(DEFAULT_MTU)),
        }
    }

    /// Add a link address given as host string and prefix length
    ///
    /// A `%scope` suffix on the host string is stripped.
    ///
    /// # Errors
    ///
    /// `Error::InvalidInput` if the host string is not an IP address or
    /// the prefix is longer than the address family allows.
    pub fn link_address(mut self, address: &str, prefix_len: u8) -> Result<Self> {
        let host = address.split('%').next().unwrap_or(address);
        let ip: IpAddr = host
            .parse()
            .map_err(|e| Error::invalid_input(format!("Link address {:?}: {}", address, e)))?;

        let max_prefix = if ip.is_ipv4() { 32 } else { 128 };
        if prefix_len > max_prefix {
            return Err(Error::invalid_input(format!(
                "Prefix length {} too long for {} (max {})",
                prefix_len, ip, max_prefix
            )));
        }

        self.record.addrs.push(format!("{}/{}", ip, prefix_len));
        Ok(self)
    }

    /// The record this interface will contribute
    pub fn record(&self) -> &InterfaceRecord {
        &self.record
    }
}

/// Assembles a [`ConnectivitySnapshot`] on the host side
#[derive(Debug, Clone, Default)]
pub struct SnapshotBuilder {
    snapshot: ConnectivitySnapshot,
}

impl SnapshotBuilder {
    /// Start an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an interface
    ///
    /// Interfaces without a name are skipped; the host has nothing the
    /// stack could refer to them by.
    pub fn interface(mut self, interface: HostInterface) -> Self {
        if interface.record.name.is_empty() {
            debug!("Skipping unnamed interface");
            return self;
        }
        self.snapshot.interfaces.push(interface.record);
        self
    }

    /// Set the default interface name (empty = unknown)
    pub fn default_interface(mut self, name: impl Into<String>) -> Self {
        self.snapshot.default_interface = name.into();
        self
    }

    /// Finish the snapshot
    pub fn build(self) -> ConnectivitySnapshot {
        self.snapshot
    }

    /// Encode the snapshot as an ingestion payload
    pub fn to_payload(&self) -> Result<String> {
        self.snapshot.to_payload()
    }
}
