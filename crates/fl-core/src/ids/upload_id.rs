use serde::{Deserialize, Serialize};

/// Identifier of a queued upload, generated by the enqueuing client.
///
/// Unique across all records in the queue store at any time; immutable
/// for the life of the record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UploadId(String);

crate::ids::impl_id!(UploadId);
