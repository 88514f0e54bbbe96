//! Composition root: wire the pool, repositories, monitor, probe task,
//! drain scheduler and indicator into one running sync subsystem.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use fl_app::usecases::{
    CancelUploadUseCase, DrainUploadsUseCase, EnqueueUploadUseCase, QueueSummaryUseCase,
    RetryFailedUploadsUseCase,
};
use fl_app::{connectivity_trigger, DrainScheduler, DrainTrigger, SyncIndicator};
use fl_core::connectivity::ConnectivityState;
use fl_core::ports::{ConnectivityMonitorPort, Subscription, UploadQueuePort};
use fl_core::SyncConfig;
use fl_infra::db::pool::init_db_pool;
use fl_infra::db::DieselSqliteExecutor;
use fl_infra::{
    ConnectivityMonitor, DieselUploadQueueRepository, HttpReachabilityProbe, HttpUploadEndpoint,
    ReachabilityProbeTask, SystemClock,
};

/// The assembled offline sync subsystem.
///
/// Construct with [`SyncRuntime::start`] from within a tokio runtime;
/// the probe and scheduler tasks live until [`SyncRuntime::shutdown`]
/// or drop.
pub struct SyncRuntime {
    pub monitor: Arc<ConnectivityMonitor>,
    pub queue: Arc<dyn UploadQueuePort>,
    pub enqueue: EnqueueUploadUseCase,
    pub cancel: CancelUploadUseCase,
    pub retry_failed: RetryFailedUploadsUseCase,
    pub summary: QueueSummaryUseCase,
    pub indicator: SyncIndicator,
    trigger_tx: mpsc::UnboundedSender<DrainTrigger>,
    tasks: Vec<JoinHandle<()>>,
    _drain_subscription: Subscription,
}

impl SyncRuntime {
    /// Open the queue database at `database_url`, start the probe and
    /// scheduler tasks, and hand back the wired use cases.
    pub fn start(config: SyncConfig, database_url: &str) -> Result<Self> {
        let pool = init_db_pool(database_url).context("open upload queue database")?;
        let clock = Arc::new(SystemClock);

        let queue: Arc<dyn UploadQueuePort> = Arc::new(DieselUploadQueueRepository::new(
            DieselSqliteExecutor::new(pool),
            clock.clone(),
        ));

        let monitor = Arc::new(ConnectivityMonitor::new(ConnectivityState::Offline));
        let endpoint = Arc::new(
            HttpUploadEndpoint::new(config.endpoint_url.clone(), config.attempt_timeout_secs)
                .context("build upload endpoint client")?,
        );
        let drain = Arc::new(DrainUploadsUseCase::new(
            queue.clone(),
            endpoint,
            monitor.clone(),
            config.max_attempts,
        ));

        let (trigger_tx, trigger_rx) = DrainScheduler::channel();
        let drain_subscription = monitor.subscribe(connectivity_trigger(trigger_tx.clone()));

        let scheduler = DrainScheduler::new(
            trigger_rx,
            drain,
            Duration::from_secs(config.drain_interval_secs),
        );
        let probe = HttpReachabilityProbe::new(config.probe_url.clone())
            .context("build reachability probe")?;
        let probe_task = ReachabilityProbeTask::new(
            monitor.clone(),
            Arc::new(probe),
            Duration::from_secs(config.probe_interval_secs),
        );

        let tasks = vec![tokio::spawn(scheduler.run()), tokio::spawn(probe_task.run())];
        let indicator = SyncIndicator::attach(monitor.as_ref());

        info!(
            endpoint_url = %config.endpoint_url,
            probe_interval_secs = config.probe_interval_secs,
            drain_interval_secs = config.drain_interval_secs,
            "sync runtime started"
        );

        Ok(Self {
            enqueue: EnqueueUploadUseCase::new(queue.clone(), clock),
            cancel: CancelUploadUseCase::new(queue.clone()),
            retry_failed: RetryFailedUploadsUseCase::new(queue.clone()),
            summary: QueueSummaryUseCase::new(queue.clone()),
            indicator,
            monitor,
            queue,
            trigger_tx,
            tasks,
            _drain_subscription: drain_subscription,
        })
    }

    /// Ask the scheduler for an immediate pass, e.g. right after an
    /// enqueue while online. Coalesced if one is already running.
    pub fn request_drain(&self) {
        let _ = self.trigger_tx.send(DrainTrigger::Manual);
    }

    /// Stop the probe and scheduler tasks. Queued records stay in the
    /// store and are picked up on the next start.
    pub fn shutdown(self) {
        for task in &self.tasks {
            task.abort();
        }
        info!("sync runtime stopped");
    }
}

impl Drop for SyncRuntime {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
