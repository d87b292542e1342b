// # Route Monitors
//
// Ready-made RouteMonitor implementations.
//
// - `ChannelRouteMonitor`: forwards notifications into a bounded channel
//   and exposes them as a stream
// - `LoggingRouteMonitor`: only logs; for hosts whose stack polls
//
// ## Usage
//
// ```rust,ignore
// use netbridge_core::monitor::ChannelRouteMonitor;
// use tokio_stream::StreamExt;
//
// let (monitor, mut changes) = ChannelRouteMonitor::new(64);
// tokio::spawn(async move {
//     while let Some(change) = changes.next().await {
//         stack.recompute_default_route(&change.interface);
//     }
// });
// ```

use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio_stream::Stream;
use tokio_stream::wrappers::ReceiverStream;
use tracing::info;

use crate::error::{Error, Result};
use crate::traits::{RouteChange, RouteMonitor};

/// Route monitor backed by a bounded tokio channel
///
/// `default_route_changed` uses `try_send`, so it never blocks and can be
/// called from threads outside any tokio runtime.
#[derive(Debug, Clone)]
pub struct ChannelRouteMonitor {
    tx: mpsc::Sender<RouteChange>,
}

impl ChannelRouteMonitor {
    /// Create a monitor and the stream its notifications arrive on
    ///
    /// # Parameters
    ///
    /// - `capacity`: Channel bound (must be > 0); when full, notifications
    ///   are rejected and the bridge logs a warning
    pub fn new(capacity: usize) -> (Self, RouteChangeStream) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            Self { tx },
            RouteChangeStream {
                inner: ReceiverStream::new(rx),
            },
        )
    }
}

impl RouteMonitor for ChannelRouteMonitor {
    fn default_route_changed(&self, change: &RouteChange) -> Result<()> {
        self.tx.try_send(change.clone()).map_err(|e| match e {
            TrySendError::Full(_) => Error::route_monitor(format!(
                "Route change channel full, dropping notification for {}",
                change.interface
            )),
            TrySendError::Closed(_) => Error::route_monitor(format!(
                "Route change channel closed, dropping notification for {}",
                change.interface
            )),
        })
    }
}

/// Stream of [`RouteChange`] notifications from a [`ChannelRouteMonitor`]
///
/// Ends once every monitor handle is dropped.
#[derive(Debug)]
pub struct RouteChangeStream {
    inner: ReceiverStream<RouteChange>,
}

impl RouteChangeStream {
    /// Take a notification if one is queued, without waiting
    pub fn try_recv(&mut self) -> Option<RouteChange> {
        let rx: &mut mpsc::Receiver<RouteChange> = self.inner.as_mut();
        rx.try_recv().ok()
    }
}

impl Stream for RouteChangeStream {
    type Item = RouteChange;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

/// Route monitor that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingRouteMonitor;

impl RouteMonitor for LoggingRouteMonitor {
    fn default_route_changed(&self, change: &RouteChange) -> Result<()> {
        info!(
            "Default route may have changed: {} (generation {})",
            change.interface, change.generation
        );
        Ok(())
    }
}
