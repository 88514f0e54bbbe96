use serde::{Deserialize, Serialize};

/// Opaque token passed to the remote endpoint on every attempt so a
/// retried upload is recognized as the same logical operation.
///
/// Stable for the life of the queue record, across all attempts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdempotencyKey(String);

crate::ids::impl_id!(IdempotencyKey);
