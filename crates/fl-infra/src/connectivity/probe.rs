//! Polling reachability probe feeding the connectivity monitor.
//!
//! There is no reliable cross-platform link-state event to listen to, so
//! connectivity is derived by probing a well-known endpoint at a modest
//! fixed interval (the polling fallback the monitor contract allows).
//! Embedding shells that do get platform events can bypass the probe and
//! call [`ConnectivityMonitor::report`] directly.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;
use tracing::{debug, warn};

use fl_core::connectivity::ConnectivityState;

use crate::connectivity::ConnectivityMonitor;

#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    /// One reachability check; `true` means the network is usable.
    async fn check(&self) -> bool;
}

/// Probes a health endpoint with a short HEAD request.
///
/// Any HTTP response counts as reachable, even an error status: the
/// network carried the round trip, and server health is not this
/// component's concern.
pub struct HttpReachabilityProbe {
    client: reqwest::Client,
    probe_url: String,
}

impl HttpReachabilityProbe {
    pub fn new(probe_url: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self {
            client,
            probe_url: probe_url.into(),
        })
    }
}

#[async_trait]
impl ReachabilityProbe for HttpReachabilityProbe {
    async fn check(&self) -> bool {
        match self.client.head(&self.probe_url).send().await {
            Ok(_) => true,
            Err(err) => {
                debug!(error = %err, "reachability probe failed");
                false
            }
        }
    }
}

/// Background task that polls the probe and reports transitions to the
/// monitor.
pub struct ReachabilityProbeTask {
    monitor: Arc<ConnectivityMonitor>,
    probe: Arc<dyn ReachabilityProbe>,
    interval: Duration,
}

impl ReachabilityProbeTask {
    pub fn new(
        monitor: Arc<ConnectivityMonitor>,
        probe: Arc<dyn ReachabilityProbe>,
        interval: Duration,
    ) -> Self {
        if interval < Duration::from_secs(1) {
            warn!(
                interval_ms = interval.as_millis() as u64,
                "reachability probe interval is unusually short"
            );
        }
        Self {
            monitor,
            probe,
            interval,
        }
    }

    /// Run the probe loop until the task is aborted.
    pub async fn run(self) {
        loop {
            let reachable = self.probe.check().await;
            self.monitor
                .report(ConnectivityState::from_reachable(reachable));
            sleep(self.interval).await;
        }
    }
}
