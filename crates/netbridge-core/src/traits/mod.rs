//! Core traits for the network bridge
//!
//! This module defines the seams between the bridge and its collaborators.
//!
//! - [`StateStore`]: Holds the latest connectivity snapshot
//! - [`RouteMonitor`]: Route-change side channel of the underlying stack
//! - [`NetworkHooks`]: Query hooks the underlying stack pulls from

pub mod network_hooks;
pub mod route_monitor;
pub mod state_store;

pub use network_hooks::{DefaultRoute, NetworkHooks};
pub use route_monitor::{RouteChange, RouteMonitor};
pub use state_store::{StateStore, StoreStatus};
