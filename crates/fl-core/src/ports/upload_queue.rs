use async_trait::async_trait;

use crate::ids::UploadId;
use crate::ports::errors::QueueError;
use crate::upload::{UploadItem, UploadStatus};

/// Partial update applied by the drain flow.
///
/// Only the attempt state is mutable; the descriptive fields and the
/// payload are immutable for the life of the record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadPatch {
    pub status: Option<UploadStatus>,
    pub attempts: Option<i32>,
    /// `Some(None)` clears a previously recorded error.
    pub last_error: Option<Option<String>>,
}

impl UploadPatch {
    pub fn status(status: UploadStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn attempt_failed(status: UploadStatus, attempts: i32, last_error: String) -> Self {
        Self {
            status: Some(status),
            attempts: Some(attempts),
            last_error: Some(Some(last_error)),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Per-status record counts, for user-facing queue awareness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueCounts {
    pub pending: i64,
    pub uploading: i64,
    pub failed: i64,
}

impl QueueCounts {
    pub fn total(self) -> i64 {
        self.pending + self.uploading + self.failed
    }
}

/// Durable, crash-safe persistence of upload records, independent of the
/// UI lifecycle.
///
/// Implementations must make `enqueue` durable before returning: a
/// process restart immediately after the call must still observe the
/// record.
#[async_trait]
pub trait UploadQueuePort: Send + Sync {
    /// Insert a new record. Fails with [`QueueError::DuplicateId`] if the
    /// id already exists.
    async fn enqueue(&self, item: UploadItem) -> Result<(), QueueError>;

    async fn get(&self, id: &UploadId) -> Result<Option<UploadItem>, QueueError>;

    /// Pending records in enqueue order (oldest first), the FIFO fairness
    /// contract of the drain flow.
    async fn list_pending(&self) -> Result<Vec<UploadItem>, QueueError>;

    /// Dead-lettered records, for user surfacing and manual requeue.
    async fn list_failed(&self) -> Result<Vec<UploadItem>, QueueError>;

    /// Idempotent; deleting a non-existent id is a no-op, not an error.
    async fn delete(&self, id: &UploadId) -> Result<(), QueueError>;

    /// Advance the attempt state. Fails with [`QueueError::NotFound`] if
    /// the record vanished, so drain races with cancellation stay
    /// observable.
    async fn update(&self, id: &UploadId, patch: UploadPatch) -> Result<(), QueueError>;

    async fn counts(&self) -> Result<QueueCounts, QueueError>;
}
