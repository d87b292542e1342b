// # netbridge-core
//
// Interface and default-route bridge for network stacks running where the
// OS cannot be asked.
//
// ## Architecture Overview
//
// A host runtime observes connectivity and pushes full snapshots; a
// user-space network stack pulls interface and default-route facts through
// two hooks. This crate sits in between:
//
// - **StateStore**: Holds the latest snapshot (reader/writer exclusion)
// - **UpdateIngester**: Parses and commits host payloads, then notifies
//   the stack's route monitor
// - **InterfaceSynthesizer**: Builds the interface list on demand
// - **DefaultRouteResolver**: Picks the default interface and address
// - **NetworkBridge**: Owns a store and wires the above together
//
// ## Design Principles
//
// 1. **Whole-snapshot replacement**: No merging, no history
// 2. **Never empty, never fatal while unknown**: Placeholders before the
//    host reports anything
// 3. **No crashes across the boundary**: Every public entry point returns
//    a `Result`, panics included
// 4. **Explicit instances**: No process-wide globals; build as many
//    bridges as needed

pub mod bridge;
pub mod config;
pub mod error;
pub mod fault;
pub mod host;
pub mod ingest;
pub mod interfaces;
pub mod monitor;
pub mod route;
pub mod snapshot;
pub mod state;
pub mod traits;

// Re-export core types for convenience
pub use bridge::{BridgeState, BridgeStatus, NetworkBridge};
pub use config::{BridgeConfig, FallbackConfig, UnknownDefaultPolicy};
pub use error::{Error, Result};
pub use ingest::UpdateIngester;
pub use interfaces::{Interface, InterfaceFlags, InterfaceSynthesizer};
pub use monitor::{ChannelRouteMonitor, LoggingRouteMonitor, RouteChangeStream};
pub use route::DefaultRouteResolver;
pub use snapshot::{ConnectivitySnapshot, InterfaceRecord};
pub use state::MemoryStateStore;
pub use traits::{DefaultRoute, NetworkHooks, RouteChange, RouteMonitor, StateStore, StoreStatus};
