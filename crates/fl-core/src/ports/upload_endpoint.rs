use async_trait::async_trait;

use crate::ports::errors::UploadError;
use crate::upload::UploadItem;

/// Remote endpoint the drain flow pushes queued files to.
///
/// The client always supplies the record's idempotency key so the server
/// can treat repeated calls as a single logical upload; at-least-once
/// delivery is therefore safe. Implementations must bound each attempt
/// with a timeout and report it as [`UploadError::Timeout`].
#[async_trait]
pub trait UploadEndpointPort: Send + Sync {
    async fn upload(&self, item: &UploadItem) -> Result<(), UploadError>;
}
