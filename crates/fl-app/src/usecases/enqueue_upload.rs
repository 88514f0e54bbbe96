use std::sync::Arc;

use thiserror::Error;
use tracing::{info, info_span, Instrument};

use fl_core::ports::{ClockPort, QueueError, UploadQueuePort};
use fl_core::upload::{NewUploadItem, UploadItem};

/// Enqueue failure, surfaced synchronously so the caller can give
/// user-facing feedback ("cannot save file locally") or hold the bytes
/// for a manual retry.
#[derive(Debug, Error)]
pub enum EnqueueError {
    #[error("invalid upload: {0}")]
    Invalid(String),

    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// Write a new upload durably into the local queue.
///
/// Works the same online and offline; the drain flow decides when the
/// record actually travels.
pub struct EnqueueUploadUseCase {
    queue: Arc<dyn UploadQueuePort>,
    clock: Arc<dyn ClockPort>,
}

impl EnqueueUploadUseCase {
    pub fn new(queue: Arc<dyn UploadQueuePort>, clock: Arc<dyn ClockPort>) -> Self {
        Self { queue, clock }
    }

    pub async fn execute(&self, new: NewUploadItem) -> Result<UploadItem, EnqueueError> {
        let span = info_span!(
            "usecase.upload.enqueue.execute",
            upload_id = %new.id,
            purpose = %new.purpose,
            payload_bytes = new.payload.len(),
        );
        self.execute_inner(new).instrument(span).await
    }

    async fn execute_inner(&self, new: NewUploadItem) -> Result<UploadItem, EnqueueError> {
        validate(&new)?;

        let item = UploadItem::enqueued(new, self.clock.now_ms());
        self.queue.enqueue(item.clone()).await?;

        info!(upload_id = %item.id, size_bytes = item.size_bytes, "upload queued");
        Ok(item)
    }
}

fn validate(new: &NewUploadItem) -> Result<(), EnqueueError> {
    if new.id.is_empty() {
        return Err(EnqueueError::Invalid("upload id must not be empty".into()));
    }
    if new.file_name.trim().is_empty() {
        return Err(EnqueueError::Invalid("file name must not be empty".into()));
    }
    if new.mime_type.trim().is_empty() {
        return Err(EnqueueError::Invalid("mime type must not be empty".into()));
    }
    if new.entity_type.trim().is_empty() || new.entity_id.is_empty() {
        return Err(EnqueueError::Invalid(
            "upload must reference a business entity".into(),
        ));
    }
    Ok(())
}
