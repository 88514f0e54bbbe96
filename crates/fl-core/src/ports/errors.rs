use thiserror::Error;

use crate::ids::UploadId;

/// Failures of the durable queue store.
#[derive(Debug, Error)]
pub enum QueueError {
    /// Enqueue called with an id already present. Caller error, not
    /// retried.
    #[error("upload {0} is already queued")]
    DuplicateId(UploadId),

    /// The store cannot be written (quota exceeded, database locked or
    /// unreadable). Surfaced to the caller as "cannot save file
    /// locally".
    #[error("local store unavailable: {0}")]
    StorageUnavailable(String),

    /// Update addressed a record that no longer exists, e.g. cancelled
    /// while a drain pass was in flight.
    #[error("upload {0} not found")]
    NotFound(UploadId),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Failure of a single remote upload attempt.
///
/// Never propagated out of the drain flow; recorded on the item as
/// `last_error` and retried on the next trigger.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("network error: {0}")]
    Network(String),

    #[error("server rejected upload with status {0}")]
    Server(u16),

    #[error("attempt timed out after {0} s")]
    Timeout(u64),
}
