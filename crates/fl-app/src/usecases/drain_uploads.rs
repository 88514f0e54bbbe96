use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span, warn, Instrument};

use fl_core::ids::UploadId;
use fl_core::ports::{
    ConnectivityMonitorPort, QueueError, UploadEndpointPort, UploadPatch, UploadQueuePort,
};
use fl_core::upload::{UploadItem, UploadStatus};

/// Result of one drain trigger.
#[derive(Debug, PartialEq, Eq)]
pub enum DrainOutcome {
    /// A pass ran to completion (possibly halted by connectivity loss).
    Completed(DrainReport),
    /// Another pass was already active; this trigger coalesced to a
    /// no-op.
    AlreadyRunning,
    /// The monitor reported offline before the pass started.
    Offline,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Records confirmed by the endpoint and deleted from the queue
    pub uploaded: usize,
    /// Failed attempts whose records stay queued for the next trigger
    pub retried: usize,
    /// Records that exhausted the attempt budget this pass
    pub dead_lettered: usize,
    /// The pass stopped early because connectivity dropped
    pub halted_offline: bool,
}

/// Push pending uploads to the remote endpoint, one at a time in FIFO
/// order, with at-least-once delivery.
///
/// Only one pass may be active at a time; the guard is an atomic
/// check-and-set taken before the first suspension point, so concurrent
/// triggers cannot race on the same record. Sequential processing is
/// deliberate: field connections are often weak, and one transfer at a
/// time bounds the bandwidth the queue consumes.
pub struct DrainUploadsUseCase {
    queue: Arc<dyn UploadQueuePort>,
    endpoint: Arc<dyn UploadEndpointPort>,
    monitor: Arc<dyn ConnectivityMonitorPort>,
    max_attempts: u32,
    drain_active: AtomicBool,
}

/// Releases the single-pass flag even if the pass errors or panics.
struct DrainActiveGuard<'a>(&'a AtomicBool);

impl Drop for DrainActiveGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

enum AttemptOutcome {
    Uploaded,
    Retried,
    DeadLettered,
    /// The record was cancelled or advanced by someone else; nothing to
    /// do.
    Skipped,
}

impl DrainUploadsUseCase {
    pub fn new(
        queue: Arc<dyn UploadQueuePort>,
        endpoint: Arc<dyn UploadEndpointPort>,
        monitor: Arc<dyn ConnectivityMonitorPort>,
        max_attempts: u32,
    ) -> Self {
        Self {
            queue,
            endpoint,
            monitor,
            max_attempts: max_attempts.max(1),
            drain_active: AtomicBool::new(false),
        }
    }

    pub async fn execute(&self) -> Result<DrainOutcome> {
        if !self.monitor.is_online() {
            debug!("skipping drain while offline");
            return Ok(DrainOutcome::Offline);
        }

        if self
            .drain_active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("drain already in progress; trigger coalesced");
            return Ok(DrainOutcome::AlreadyRunning);
        }
        let _guard = DrainActiveGuard(&self.drain_active);

        let span = info_span!("usecase.upload.drain.execute");
        let report = self.run_pass().instrument(span).await?;

        info!(
            uploaded = report.uploaded,
            retried = report.retried,
            dead_lettered = report.dead_lettered,
            halted_offline = report.halted_offline,
            "drain pass finished"
        );
        Ok(DrainOutcome::Completed(report))
    }

    /// One pass over the pending queue. Re-fetches after each batch so
    /// records enqueued mid-pass are picked up, but attempts every
    /// record at most once per pass; persistently failing records wait
    /// for the next trigger.
    async fn run_pass(&self) -> Result<DrainReport> {
        let mut report = DrainReport::default();
        let mut attempted: HashSet<UploadId> = HashSet::new();

        loop {
            let batch: Vec<UploadItem> = self
                .queue
                .list_pending()
                .await
                .context("list pending uploads")?
                .into_iter()
                .filter(|item| !attempted.contains(&item.id))
                .collect();
            if batch.is_empty() {
                break;
            }

            for item in batch {
                // An in-flight attempt is never cancelled; connectivity
                // is re-checked only between items.
                if !self.monitor.is_online() {
                    report.halted_offline = true;
                    return Ok(report);
                }

                attempted.insert(item.id.clone());
                match self.attempt(item).await? {
                    AttemptOutcome::Uploaded => report.uploaded += 1,
                    AttemptOutcome::Retried => report.retried += 1,
                    AttemptOutcome::DeadLettered => report.dead_lettered += 1,
                    AttemptOutcome::Skipped => {}
                }
            }
        }

        Ok(report)
    }

    async fn attempt(&self, item: UploadItem) -> Result<AttemptOutcome> {
        let Some(uploading) = item.status.start_attempt() else {
            warn!(upload_id = %item.id, status = ?item.status, "skipping record not in pending state");
            return Ok(AttemptOutcome::Skipped);
        };

        match self
            .queue
            .update(&item.id, UploadPatch::status(uploading))
            .await
        {
            Ok(()) => {}
            Err(QueueError::NotFound(_)) => {
                debug!(upload_id = %item.id, "record cancelled before attempt");
                return Ok(AttemptOutcome::Skipped);
            }
            Err(err) => return Err(err).context("mark upload as uploading"),
        }

        match self.endpoint.upload(&item).await {
            Ok(()) => {
                self.queue
                    .delete(&item.id)
                    .await
                    .context("delete uploaded record")?;
                info!(upload_id = %item.id, attempts = item.attempts + 1, "upload confirmed");
                Ok(AttemptOutcome::Uploaded)
            }
            Err(upload_err) => {
                let attempts = item.attempts.saturating_add(1);
                let budget_exhausted = attempts as u32 >= self.max_attempts;
                let next_status = uploading
                    .on_attempt_failed(budget_exhausted)
                    .unwrap_or(UploadStatus::Pending);

                warn!(
                    upload_id = %item.id,
                    attempts,
                    max_attempts = self.max_attempts,
                    error = %upload_err,
                    "upload attempt failed"
                );

                let patch =
                    UploadPatch::attempt_failed(next_status, attempts, upload_err.to_string());
                match self.queue.update(&item.id, patch).await {
                    Ok(()) => {}
                    Err(QueueError::NotFound(_)) => {
                        debug!(upload_id = %item.id, "record cancelled during attempt");
                        return Ok(AttemptOutcome::Skipped);
                    }
                    Err(err) => return Err(err).context("record failed attempt"),
                }

                if budget_exhausted {
                    warn!(upload_id = %item.id, "attempt budget exhausted; record dead-lettered");
                    Ok(AttemptOutcome::DeadLettered)
                } else {
                    Ok(AttemptOutcome::Retried)
                }
            }
        }
    }
}
