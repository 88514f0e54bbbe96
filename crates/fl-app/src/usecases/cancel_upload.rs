use std::sync::Arc;

use tracing::{info, info_span, Instrument};

use fl_core::ids::UploadId;
use fl_core::ports::{QueueError, UploadQueuePort};

/// Explicit user-initiated cancellation: the one path besides a
/// confirmed upload that removes a record from the store.
pub struct CancelUploadUseCase {
    queue: Arc<dyn UploadQueuePort>,
}

impl CancelUploadUseCase {
    pub fn new(queue: Arc<dyn UploadQueuePort>) -> Self {
        Self { queue }
    }

    pub async fn execute(&self, id: &UploadId) -> Result<(), QueueError> {
        let span = info_span!("usecase.upload.cancel.execute", upload_id = %id);
        async {
            self.queue.delete(id).await?;
            info!(upload_id = %id, "upload cancelled");
            Ok(())
        }
        .instrument(span)
        .await
    }
}
