//! FieldLink Application Orchestration Layer
//!
//! This crate contains the upload queue use cases and the long-running
//! sync tasks built on top of the fl-core ports.

pub mod sync;
pub mod testing;
pub mod usecases;

pub use sync::{connectivity_trigger, DrainScheduler, DrainTrigger, SyncBadge, SyncIndicator};
pub use usecases::{
    CancelUploadUseCase, DrainOutcome, DrainReport, DrainUploadsUseCase, EnqueueError,
    EnqueueUploadUseCase, QueueSummary, QueueSummaryUseCase, RetryFailedUploadsUseCase,
};
