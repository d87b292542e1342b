//! Interface list synthesis
//!
//! Turns the current snapshot into the interface list an OS enumeration
//! would have produced.
//!
//! ## Rules
//!
//! 1. No interface records (including Unset): one placeholder loopback
//! 2. Otherwise one descriptor per record, in host order, indexed from 1
//! 3. Flags are {up, broadcast, multicast}; multicast-quirk names get
//!    multicast set again as a named rule
//! 4. Address strings that do not parse as CIDR are dropped one by one
//!
//! The list is recomputed from the store on every call and never cached.

use bitflags::bitflags;
use ipnet::IpNet;
use std::sync::Arc;
use tracing::trace;

use crate::config::BridgeConfig;
use crate::error::Result;
use crate::snapshot::{ConnectivitySnapshot, InterfaceRecord};
use crate::traits::StateStore;

bitflags! {
    /// Interface flags, with the conventional OS bit values
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct InterfaceFlags: u32 {
        /// Interface is administratively up
        const UP = 1 << 0;
        /// Interface supports broadcast
        const BROADCAST = 1 << 1;
        /// Interface is a loopback interface
        const LOOPBACK = 1 << 2;
        /// Interface is a point-to-point link
        const POINT_TO_POINT = 1 << 3;
        /// Interface supports multicast
        const MULTICAST = 1 << 4;
        /// Interface is running
        const RUNNING = 1 << 5;
    }
}

/// A synthesized interface descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    /// 1-based position in the host's list (not a stable identity)
    pub index: u32,
    /// Interface name
    pub name: String,
    /// Link MTU
    pub mtu: u32,
    /// Interface flags
    pub flags: InterfaceFlags,
    /// Parsed addresses with their prefix length, in host order
    pub addrs: Vec<IpNet>,
}

impl Interface {
    /// Whether this is a loopback interface
    pub fn is_loopback(&self) -> bool {
        self.flags.contains(InterfaceFlags::LOOPBACK)
    }
}

/// Builds interface lists from a [`StateStore`]
#[derive(Clone)]
pub struct InterfaceSynthesizer {
    store: Arc<dyn StateStore>,
    config: Arc<BridgeConfig>,
}

impl InterfaceSynthesizer {
    /// Create a new synthesizer reading from `store`
    pub fn new(store: Arc<dyn StateStore>, config: Arc<BridgeConfig>) -> Self {
        Self { store, config }
    }

    /// List interfaces for the current snapshot
    pub fn list_interfaces(&self) -> Result<Vec<Interface>> {
        let snapshot = self.store.get()?;
        Ok(self.synthesize(&snapshot))
    }

    /// List interfaces for a given snapshot
    ///
    /// Never returns an empty list.
    pub fn synthesize(&self, snapshot: &ConnectivitySnapshot) -> Vec<Interface> {
        if snapshot.is_empty() {
            trace!("No interfaces reported, using placeholder loopback");
            return vec![self.placeholder_loopback()];
        }

        snapshot
            .interfaces
            .iter()
            .enumerate()
            .map(|(position, record)| self.describe(position, record))
            .collect()
    }

    fn placeholder_loopback(&self) -> Interface {
        let fallback = &self.config.fallback;
        Interface {
            index: 1,
            name: fallback.interface_name.clone(),
            mtu: fallback.mtu,
            flags: InterfaceFlags::UP | InterfaceFlags::LOOPBACK | InterfaceFlags::MULTICAST,
            addrs: vec![fallback.address],
        }
    }

    fn describe(&self, position: usize, record: &InterfaceRecord) -> Interface {
        let mut flags = InterfaceFlags::UP | InterfaceFlags::MULTICAST | InterfaceFlags::BROADCAST;
        if self.config.is_multicast_quirk(&record.name) {
            flags |= InterfaceFlags::MULTICAST;
        }

        Interface {
            index: u32::try_from(position + 1).unwrap_or(u32::MAX),
            name: record.name.clone(),
            mtu: record.mtu,
            flags,
            addrs: record.parsed_addrs().collect(),
        }
    }
}
