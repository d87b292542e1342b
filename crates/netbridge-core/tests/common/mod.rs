//! Test doubles and common utilities for architecture contract tests
//!
//! Not every contract test uses every helper.
#![allow(dead_code)]

use netbridge_core::error::{Error, Result};
use netbridge_core::snapshot::{ConnectivitySnapshot, InterfaceRecord};
use netbridge_core::state::MemoryStateStore;
use netbridge_core::traits::{RouteChange, RouteMonitor, StateStore, StoreStatus};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Scenario A from the bridge contract: one Wi-Fi interface, default wlan0
pub const SCENARIO_A: &str =
    r#"{"Interfaces":[{"Name":"wlan0","MTU":1500,"Addrs":["10.0.0.5/24"]}],"DefaultInterface":"wlan0"}"#;

/// Payloads that must be rejected without touching the store
pub const MALFORMED_PAYLOADS: &[&str] = &[
    "",
    "   ",
    "{",
    "null",
    "[]",
    "42",
    r#""wlan0""#,
    r#"{"Interfaces": {"Name": "wlan0"}}"#,
    r#"{"Interfaces": [{"Name": "wlan0", "MTU": "1500"}]}"#,
    r#"{"Interfaces": [{"Name": "wlan0", "Addrs": "10.0.0.5/24"}]}"#,
    r#"{"Interfaces": [], "DefaultInterface": ["wlan0"]}"#,
];

/// Build a payload from (name, mtu, addrs) triples
pub fn payload(interfaces: &[(&str, u32, &[&str])], default_interface: &str) -> String {
    let snapshot = ConnectivitySnapshot {
        interfaces: interfaces
            .iter()
            .map(|(name, mtu, addrs)| InterfaceRecord {
                name: name.to_string(),
                mtu: *mtu,
                addrs: addrs.iter().map(|a| a.to_string()).collect(),
            })
            .collect(),
        default_interface: default_interface.to_string(),
    };
    snapshot.to_payload().expect("snapshot encodes")
}

/// A RouteMonitor that records every notification
#[derive(Default)]
pub struct RecordingRouteMonitor {
    changes: Mutex<Vec<RouteChange>>,
}

impl RecordingRouteMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interfaces named so far, in order
    pub fn interfaces(&self) -> Vec<String> {
        self.changes
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.interface.clone())
            .collect()
    }

    pub fn changes(&self) -> Vec<RouteChange> {
        self.changes.lock().unwrap().clone()
    }
}

impl RouteMonitor for RecordingRouteMonitor {
    fn default_route_changed(&self, change: &RouteChange) -> Result<()> {
        self.changes.lock().unwrap().push(change.clone());
        Ok(())
    }
}

/// A RouteMonitor that always returns an error
#[derive(Default)]
pub struct FailingRouteMonitor {
    calls: AtomicUsize,
}

impl FailingRouteMonitor {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RouteMonitor for FailingRouteMonitor {
    fn default_route_changed(&self, _change: &RouteChange) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::route_monitor("listener unavailable"))
    }
}

/// A RouteMonitor that panics on every call
#[derive(Default)]
pub struct PanickingRouteMonitor {
    calls: AtomicUsize,
}

impl PanickingRouteMonitor {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RouteMonitor for PanickingRouteMonitor {
    fn default_route_changed(&self, change: &RouteChange) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        panic!("listener crashed handling {}", change.interface);
    }
}

/// A StateStore wrapping MemoryStateStore that can be told to panic
#[derive(Default)]
pub struct FaultyStateStore {
    inner: MemoryStateStore,
    panic_on_set: AtomicBool,
    panic_on_get: AtomicBool,
}

impl FaultyStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panic_on_set(&self, enabled: bool) {
        self.panic_on_set.store(enabled, Ordering::SeqCst);
    }

    pub fn panic_on_get(&self, enabled: bool) {
        self.panic_on_get.store(enabled, Ordering::SeqCst);
    }
}

impl StateStore for FaultyStateStore {
    fn get(&self) -> Result<Arc<ConnectivitySnapshot>> {
        if self.panic_on_get.load(Ordering::SeqCst) {
            panic!("store read invariant violated");
        }
        self.inner.get()
    }

    fn set(&self, snapshot: ConnectivitySnapshot) -> Result<u64> {
        if self.panic_on_set.load(Ordering::SeqCst) {
            panic!("store write invariant violated");
        }
        self.inner.set(snapshot)
    }

    fn status(&self) -> Result<StoreStatus> {
        self.inner.status()
    }
}
