use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error};

use fl_core::ports::ConnectivityListener;

use crate::usecases::DrainUploadsUseCase;

/// Why a drain pass is being requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainTrigger {
    /// The connectivity monitor transitioned offline to online
    CameOnline,
    /// Caller-requested pass, e.g. right after an enqueue while online
    Manual,
}

/// Build the monitor listener that wakes the scheduler on reconnect.
///
/// The listener only schedules work: a lossless unbounded send, nothing
/// that can block inside the monitor's notification loop.
pub fn connectivity_trigger(tx: mpsc::UnboundedSender<DrainTrigger>) -> ConnectivityListener {
    Box::new(move |state| {
        if state.is_online() {
            let _ = tx.send(DrainTrigger::CameOnline);
        }
    })
}

/// Funnel for drain triggers: offline-to-online transitions, manual
/// requests, and a periodic tick that catches records enqueued after
/// the last pass.
///
/// Overlapping triggers are harmless; the drain use case coalesces them
/// through its single-pass guard.
pub struct DrainScheduler {
    trigger_rx: mpsc::UnboundedReceiver<DrainTrigger>,
    drain: Arc<DrainUploadsUseCase>,
    drain_interval: Duration,
}

impl DrainScheduler {
    pub fn channel() -> (
        mpsc::UnboundedSender<DrainTrigger>,
        mpsc::UnboundedReceiver<DrainTrigger>,
    ) {
        mpsc::unbounded_channel()
    }

    pub fn new(
        trigger_rx: mpsc::UnboundedReceiver<DrainTrigger>,
        drain: Arc<DrainUploadsUseCase>,
        drain_interval: Duration,
    ) -> Self {
        Self {
            trigger_rx,
            drain,
            drain_interval,
        }
    }

    /// Run the scheduling loop until every trigger sender is dropped.
    ///
    /// The first interval tick fires immediately, which doubles as the
    /// startup pass picking up records left over from a previous run.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.drain_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                trigger = self.trigger_rx.recv() => {
                    match trigger {
                        Some(trigger) => self.drain(Some(trigger)).await,
                        None => {
                            debug!("all trigger senders dropped; scheduler stopping");
                            break;
                        }
                    }
                }
                _ = ticker.tick() => self.drain(None).await,
            }
        }
    }

    async fn drain(&self, trigger: Option<DrainTrigger>) {
        debug!(trigger = ?trigger, "drain requested");
        if let Err(err) = self.drain.execute().await {
            error!(error = %err, "drain pass failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryUploadQueue, ScriptedEndpoint, ToggleMonitor};
    use fl_core::ids::{EntityId, UploadId};
    use fl_core::ports::{ConnectivityMonitorPort, UploadQueuePort};
    use fl_core::upload::{NewUploadItem, UploadItem};
    use tokio::time::advance;

    fn sample_item(id: &str) -> UploadItem {
        let new = NewUploadItem::new(
            UploadId::from(id),
            format!("{id}.jpg"),
            "image/jpeg",
            vec![7],
            "trip_proof",
            "trip",
            EntityId::from("trip-1"),
        );
        UploadItem::enqueued(new, 0)
    }

    struct Harness {
        queue: Arc<MemoryUploadQueue>,
        endpoint: Arc<ScriptedEndpoint>,
        monitor: Arc<ToggleMonitor>,
        trigger_tx: mpsc::UnboundedSender<DrainTrigger>,
        handle: tokio::task::JoinHandle<()>,
    }

    fn spawn_scheduler(online: bool) -> Harness {
        let queue = Arc::new(MemoryUploadQueue::new());
        let endpoint = Arc::new(ScriptedEndpoint::new());
        let monitor = Arc::new(ToggleMonitor::new(online));
        let drain = Arc::new(DrainUploadsUseCase::new(
            queue.clone(),
            endpoint.clone(),
            monitor.clone(),
            8,
        ));
        let (trigger_tx, trigger_rx) = DrainScheduler::channel();
        let scheduler = DrainScheduler::new(trigger_rx, drain, Duration::from_secs(60));
        let handle = tokio::spawn(scheduler.run());
        Harness {
            queue,
            endpoint,
            monitor,
            trigger_tx,
            handle,
        }
    }

    async fn wait_until_drained(queue: &Arc<MemoryUploadQueue>) {
        for _ in 0..200 {
            if queue.list_pending().await.expect("list").is_empty() {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("queue never drained");
    }

    #[tokio::test(start_paused = true)]
    async fn periodic_tick_drains_while_online() {
        let h = spawn_scheduler(true);
        // Let the immediate startup tick pass before enqueueing
        tokio::task::yield_now().await;

        h.queue.enqueue(sample_item("tick")).await.expect("enqueue");
        advance(Duration::from_secs(60)).await;
        wait_until_drained(&h.queue).await;

        assert_eq!(h.endpoint.attempted_ids().len(), 1);
        h.handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn reconnect_trigger_drains_without_waiting_for_tick() {
        let h = spawn_scheduler(false);
        tokio::task::yield_now().await;
        h.queue
            .enqueue(sample_item("offline-item"))
            .await
            .expect("enqueue");

        // Simulate the monitor wiring: flip online, then deliver the
        // trigger the listener would have sent.
        h.monitor.set_online(true);
        h.trigger_tx
            .send(DrainTrigger::CameOnline)
            .expect("send trigger");
        wait_until_drained(&h.queue).await;

        assert_eq!(h.endpoint.attempted_ids().len(), 1);
        h.handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_while_offline_do_not_reach_the_endpoint() {
        let h = spawn_scheduler(false);
        tokio::task::yield_now().await;
        h.queue
            .enqueue(sample_item("stuck"))
            .await
            .expect("enqueue");

        for _ in 0..3 {
            advance(Duration::from_secs(60)).await;
            tokio::task::yield_now().await;
        }

        assert!(h.endpoint.attempted_ids().is_empty());
        assert_eq!(h.queue.list_pending().await.expect("list").len(), 1);
        h.handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn listener_sends_trigger_on_online_transition_only() {
        let (tx, mut rx) = DrainScheduler::channel();
        let monitor = ToggleMonitor::new(false);
        let _subscription = monitor.subscribe(connectivity_trigger(tx));

        monitor.set_online(true);
        monitor.set_online(false);
        monitor.set_online(true);

        assert_eq!(rx.try_recv(), Ok(DrainTrigger::CameOnline));
        assert_eq!(rx.try_recv(), Ok(DrainTrigger::CameOnline));
        assert!(rx.try_recv().is_err(), "offline must not trigger a drain");
    }
}
