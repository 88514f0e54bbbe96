use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, info_span, warn, Instrument};

use fl_core::ports::{QueueError, UploadPatch, UploadQueuePort};

/// Return dead-lettered records to the queue on user request.
///
/// The attempt counter is reset so the record gets a fresh budget; the
/// idempotency key is untouched, so the server still recognizes
/// earlier partial deliveries.
pub struct RetryFailedUploadsUseCase {
    queue: Arc<dyn UploadQueuePort>,
}

impl RetryFailedUploadsUseCase {
    pub fn new(queue: Arc<dyn UploadQueuePort>) -> Self {
        Self { queue }
    }

    /// Requeue every dead-lettered record; returns how many were
    /// requeued.
    pub async fn execute(&self) -> Result<usize> {
        let span = info_span!("usecase.upload.retry_failed.execute");
        self.execute_inner().instrument(span).await
    }

    async fn execute_inner(&self) -> Result<usize> {
        let failed = self
            .queue
            .list_failed()
            .await
            .context("list dead-lettered uploads")?;

        let mut requeued = 0;
        for item in failed {
            let Some(status) = item.status.requeue() else {
                continue;
            };
            let patch = UploadPatch {
                status: Some(status),
                attempts: Some(0),
                last_error: Some(None),
            };
            match self.queue.update(&item.id, patch).await {
                Ok(()) => requeued += 1,
                Err(QueueError::NotFound(_)) => {
                    warn!(upload_id = %item.id, "record vanished before requeue");
                }
                Err(err) => return Err(err).context("requeue dead-lettered upload"),
            }
        }

        info!(requeued, "dead-lettered uploads returned to queue");
        Ok(requeued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryUploadQueue;
    use fl_core::ids::{EntityId, UploadId};
    use fl_core::upload::{NewUploadItem, UploadItem, UploadStatus};

    fn failed_item(id: &str) -> UploadItem {
        let new = NewUploadItem::new(
            UploadId::from(id),
            "photo.jpg",
            "image/jpeg",
            vec![1],
            "trip_proof",
            "trip",
            EntityId::from("trip-1"),
        );
        let mut item = UploadItem::enqueued(new, 0);
        item.status = UploadStatus::Failed;
        item.attempts = 8;
        item.last_error = Some("gave up".to_string());
        item
    }

    #[tokio::test]
    async fn requeues_failed_records_with_fresh_budget() {
        let queue = Arc::new(MemoryUploadQueue::new());
        queue.enqueue(failed_item("f1")).await.expect("enqueue");
        queue.enqueue(failed_item("f2")).await.expect("enqueue");

        let usecase = RetryFailedUploadsUseCase::new(queue.clone());
        let requeued = usecase.execute().await.expect("retry");

        assert_eq!(requeued, 2);
        let pending = queue.list_pending().await.expect("list");
        assert_eq!(pending.len(), 2);
        assert!(pending
            .iter()
            .all(|item| item.attempts == 0 && item.last_error.is_none()));
        assert!(queue.list_failed().await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn nothing_to_requeue_returns_zero() {
        let queue = Arc::new(MemoryUploadQueue::new());
        let usecase = RetryFailedUploadsUseCase::new(queue);

        assert_eq!(usecase.execute().await.expect("retry"), 0);
    }
}
