//! Error types for the network bridge
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the network bridge
#[derive(Error, Debug)]
pub enum Error {
    /// The ingestion payload failed structural validation
    #[error("Failed to parse network state: {0}")]
    Parse(#[from] serde_json::Error),

    /// An unexpected internal fault was caught at a public entry point
    #[error("Recovered from internal fault: {0}")]
    FaultRecovered(String),

    /// A single address could not be parsed as CIDR
    ///
    /// Never returned from a public entry point; the offending address
    /// is logged and dropped.
    #[error("Skipped address {address:?}: {reason}")]
    AddressSkipped {
        /// The address string as pushed by the host
        address: String,
        /// Parser message
        reason: String,
    },

    /// The default interface exists but none of its addresses parse
    #[error("Default interface {0:?} found but has no usable address")]
    DefaultInterfaceNoUsableAddress(String),

    /// The default interface is not present in the interface list
    #[error("Default interface {0:?} not found in interface list")]
    DefaultInterfaceNotFound(String),

    /// Route-change side channel delivery failed
    #[error("Route monitor error: {0}")]
    RouteMonitor(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a recovered-fault error
    pub fn fault(msg: impl Into<String>) -> Self {
        Self::FaultRecovered(msg.into())
    }

    /// Create an address-skipped error
    pub fn address_skipped(address: impl Into<String>, reason: impl ToString) -> Self {
        Self::AddressSkipped {
            address: address.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a route monitor error
    pub fn route_monitor(msg: impl Into<String>) -> Self {
        Self::RouteMonitor(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this error was produced by the fault boundary
    pub fn is_fault(&self) -> bool {
        matches!(self, Self::FaultRecovered(_))
    }
}
