pub mod cancel_upload;
pub mod drain_uploads;
pub mod enqueue_upload;
pub mod queue_summary;
pub mod retry_failed_uploads;

pub use cancel_upload::CancelUploadUseCase;
pub use drain_uploads::{DrainOutcome, DrainReport, DrainUploadsUseCase};
pub use enqueue_upload::{EnqueueError, EnqueueUploadUseCase};
pub use queue_summary::{QueueSummary, QueueSummaryUseCase};
pub use retry_failed_uploads::RetryFailedUploadsUseCase;
