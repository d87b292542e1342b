//! Configuration types for the network bridge
//!
//! Every field has a default, so an empty JSON object (or
//! `BridgeConfig::default()`) yields the stock behavior.

use ipnet::{IpNet, Ipv4Net};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Main bridge configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Placeholder used before the host has reported anything
    #[serde(default)]
    pub fallback: FallbackConfig,

    /// Interface names that always get the multicast flag set explicitly
    ///
    /// Every synthesized interface is already multicast-capable; names
    /// listed here get the flag set again as a separate rule.
    #[serde(default = "default_multicast_quirk_interfaces")]
    pub multicast_quirk_interfaces: Vec<String>,

    /// What to do when the default interface names no known interface
    #[serde(default)]
    pub unknown_default: UnknownDefaultPolicy,

    /// Capacity of the route-change notification channel
    ///
    /// When full, notifications are dropped (with a warning log).
    #[serde(default = "default_route_channel_capacity")]
    pub route_channel_capacity: usize,
}

impl BridgeConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            fallback: FallbackConfig::default(),
            multicast_quirk_interfaces: default_multicast_quirk_interfaces(),
            unknown_default: UnknownDefaultPolicy::default(),
            route_channel_capacity: default_route_channel_capacity(),
        }
    }

    /// Set the unknown-default policy
    pub fn with_unknown_default(mut self, policy: UnknownDefaultPolicy) -> Self {
        self.unknown_default = policy;
        self
    }

    /// Set the route-change channel capacity
    pub fn with_route_channel_capacity(mut self, capacity: usize) -> Self {
        self.route_channel_capacity = capacity;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.fallback.validate()?;

        if self.route_channel_capacity == 0 {
            return Err(crate::Error::config("Route channel capacity must be > 0"));
        }

        if self.multicast_quirk_interfaces.iter().any(|n| n.is_empty()) {
            return Err(crate::Error::config(
                "Multicast quirk interface names cannot be empty",
            ));
        }

        Ok(())
    }

    /// Whether `name` is subject to the multicast quirk
    pub fn is_multicast_quirk(&self, name: &str) -> bool {
        self.multicast_quirk_interfaces.iter().any(|n| n == name)
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Placeholder interface handed out while the store is empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackConfig {
    /// Interface name (e.g., "dummy0")
    #[serde(default = "default_fallback_name")]
    pub interface_name: String,

    /// MTU of the synthesized loopback
    #[serde(default = "default_fallback_mtu")]
    pub mtu: u32,

    /// Address of the synthesized loopback; its host part doubles as the
    /// placeholder default-route address
    #[serde(default = "default_fallback_address")]
    pub address: IpNet,
}

impl FallbackConfig {
    /// Validate the fallback configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.interface_name.is_empty() {
            return Err(crate::Error::config("Fallback interface name cannot be empty"));
        }
        if self.mtu == 0 {
            return Err(crate::Error::config("Fallback MTU must be > 0"));
        }
        Ok(())
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            interface_name: default_fallback_name(),
            mtu: default_fallback_mtu(),
            address: default_fallback_address(),
        }
    }
}

/// Policy for a default interface name that matches no interface record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownDefaultPolicy {
    /// Return `Error::DefaultInterfaceNotFound`
    #[default]
    Fail,
    /// Treat the name as unset and hand out the placeholder route
    Placeholder,
}

fn default_fallback_name() -> String {
    "dummy0".to_string()
}

fn default_fallback_mtu() -> u32 {
    1500
}

fn default_fallback_address() -> IpNet {
    IpNet::V4(Ipv4Net::new_assert(Ipv4Addr::LOCALHOST, 8))
}

fn default_multicast_quirk_interfaces() -> Vec<String> {
    vec!["lo".to_string(), "wlan0".to_string()]
}

fn default_route_channel_capacity() -> usize {
    64
}
