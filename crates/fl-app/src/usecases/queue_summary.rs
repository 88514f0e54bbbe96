use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug_span, Instrument};

use fl_core::ports::{QueueCounts, UploadQueuePort};
use fl_core::upload::UploadItem;

/// User-facing view of the queue: how much is waiting, and which
/// records need attention.
#[derive(Debug, Serialize)]
pub struct QueueSummary {
    pub pending: i64,
    pub uploading: i64,
    pub failed: i64,
    /// Dead-lettered records, newest last, for display and manual retry
    pub failed_items: Vec<UploadItem>,
}

impl QueueSummary {
    fn new(counts: QueueCounts, failed_items: Vec<UploadItem>) -> Self {
        Self {
            pending: counts.pending,
            uploading: counts.uploading,
            failed: counts.failed,
            failed_items,
        }
    }

    pub fn has_backlog(&self) -> bool {
        self.pending + self.uploading + self.failed > 0
    }
}

pub struct QueueSummaryUseCase {
    queue: Arc<dyn UploadQueuePort>,
}

impl QueueSummaryUseCase {
    pub fn new(queue: Arc<dyn UploadQueuePort>) -> Self {
        Self { queue }
    }

    pub async fn execute(&self) -> Result<QueueSummary> {
        let span = debug_span!("usecase.upload.queue_summary.execute");
        async {
            let counts = self.queue.counts().await.context("count queued uploads")?;
            let failed_items = self
                .queue
                .list_failed()
                .await
                .context("list dead-lettered uploads")?;
            Ok(QueueSummary::new(counts, failed_items))
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryUploadQueue;
    use fl_core::ids::{EntityId, UploadId};
    use fl_core::upload::{NewUploadItem, UploadItem, UploadStatus};

    fn item(id: &str, status: UploadStatus) -> UploadItem {
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
        item.status = status;
        item
    }

    #[tokio::test]
    async fn summarizes_counts_and_failed_records() {
        let queue = Arc::new(MemoryUploadQueue::new());
        queue
            .enqueue(item("p1", UploadStatus::Pending))
            .await
            .expect("enqueue");
        queue
            .enqueue(item("p2", UploadStatus::Pending))
            .await
            .expect("enqueue");
        queue
            .enqueue(item("f1", UploadStatus::Failed))
            .await
            .expect("enqueue");

        let usecase = QueueSummaryUseCase::new(queue);
        let summary = usecase.execute().await.expect("summary");

        assert_eq!(summary.pending, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failed_items.len(), 1);
        assert_eq!(summary.failed_items[0].id.to_string(), "f1");
        assert!(summary.has_backlog());
    }

    #[tokio::test]
    async fn empty_queue_has_no_backlog() {
        let queue = Arc::new(MemoryUploadQueue::new());
        let usecase = QueueSummaryUseCase::new(queue);

        let summary = usecase.execute().await.expect("summary");
        assert!(!summary.has_backlog());
    }
}
