//! Minimal embedding example for netbridge-core
//!
//! This example plays both sides of the bridge: a host pushing snapshots
//! built from its connectivity callbacks, and a network stack that pulls
//! interfaces and the default route, re-resolving whenever the bridge
//! reports a route change.
//!
//! ## Configuration
//!
//! - `NETBRIDGE_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//! - `NETBRIDGE_UNKNOWN_DEFAULT`: fail or placeholder (default fail)
//! - `NETBRIDGE_ROUTE_CHANNEL_CAPACITY`: route-change channel bound

use anyhow::{Context, Result};
use netbridge_core::host::{HostInterface, SnapshotBuilder};
use netbridge_core::{BridgeConfig, NetworkBridge, NetworkHooks, UnknownDefaultPolicy};
use std::env;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio_stream::StreamExt;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn config_from_env() -> Result<BridgeConfig> {
    let mut config = BridgeConfig::default();

    if let Ok(policy) = env::var("NETBRIDGE_UNKNOWN_DEFAULT") {
        config.unknown_default = match policy.to_lowercase().as_str() {
            "fail" => UnknownDefaultPolicy::Fail,
            "placeholder" => UnknownDefaultPolicy::Placeholder,
            other => anyhow::bail!(
                "NETBRIDGE_UNKNOWN_DEFAULT '{}' is not valid. Valid values: fail, placeholder",
                other
            ),
        };
    }

    if let Ok(capacity) = env::var("NETBRIDGE_ROUTE_CHANNEL_CAPACITY") {
        config.route_channel_capacity = capacity
            .parse()
            .with_context(|| format!("NETBRIDGE_ROUTE_CHANNEL_CAPACITY '{}'", capacity))?;
    }

    config.validate()?;
    Ok(config)
}

fn log_level_from_env() -> Level {
    match env::var("NETBRIDGE_LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Stand-in for the stack's interface poll
fn poll_stack(hooks: &dyn NetworkHooks) {
    match hooks.interfaces() {
        Ok(interfaces) => {
            for iface in interfaces {
                let addrs: Vec<String> = iface.addrs.iter().map(|a| a.to_string()).collect();
                info!(
                    "  [{}] {} mtu={} flags={:?} addrs={:?}",
                    iface.index, iface.name, iface.mtu, iface.flags, addrs
                );
            }
        }
        Err(e) => error!("Interface poll failed: {}", e),
    }

    match hooks.default_interface() {
        Ok(route) => info!("  default route via {} ({})", route.name, route.address),
        Err(e) => warn!("  default route unavailable: {}", e),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level_from_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let config = config_from_env()?;
    let (bridge, mut changes) = NetworkBridge::with_route_channel(config)?;
    let bridge = Arc::new(bridge);

    info!("Stack startup, before the host has reported anything:");
    poll_stack(&*bridge);

    // Stack side: recompute the default route on every notification.
    // The task holds a bridge handle, so the stream never ends on its own.
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
    let stack = {
        let bridge = Arc::clone(&bridge);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    Some(change) = changes.next() => {
                        info!(
                            "Route change #{} via {}, re-polling:",
                            change.generation, change.interface
                        );
                        poll_stack(&*bridge);
                    }
                    _ = &mut shutdown_rx => break,
                }
            }
        })
    };

    // Host side: Wi-Fi comes up
    let wifi = SnapshotBuilder::new()
        .interface(
            HostInterface::new("wlan0", Some(1500))
                .link_address("192.168.1.5", 24)?
                .link_address("fe80::1c2b:3ff:fe4d:5e6f%wlan0", 64)?,
        )
        .default_interface("wlan0");
    bridge.update_network_state(&wifi.to_payload()?)?;

    // Host side: cellular joins and takes over the default route
    let cellular = SnapshotBuilder::new()
        .interface(HostInterface::new("wlan0", Some(1500)).link_address("192.168.1.5", 24)?)
        .interface(HostInterface::new("rmnet_data0", None).link_address("2607:fb90::9", 64)?)
        .default_interface("rmnet_data0");
    bridge.update_network_state(&cellular.to_payload()?)?;

    // A broken host payload is rejected and changes nothing
    if let Err(e) = bridge.update_network_state("{\"Interfaces\": 42}") {
        warn!("Rejected host payload: {}", e);
    }

    let status = bridge.status()?;
    info!("Bridge status: {}", describe_status(&status));

    // Queued notifications are drained before the shutdown branch is taken
    let _ = shutdown_tx.send(());
    stack.await.context("Stack task failed")?;

    Ok(())
}

fn describe_status(status: &netbridge_core::BridgeStatus) -> String {
    format!(
        "{:?} generation={} interfaces={} default={:?}",
        status.state, status.generation, status.interface_count, status.default_interface
    )
}
