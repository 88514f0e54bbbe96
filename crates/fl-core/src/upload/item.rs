use serde::{Deserialize, Serialize};

use crate::ids::{EntityId, IdempotencyKey, UploadId};
use crate::upload::UploadStatus;

/// Caller-supplied fields of an upload about to be enqueued.
///
/// Everything here is immutable once the record exists; the queue store
/// adds the attempt state and clock stamps on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUploadItem {
    pub id: UploadId,
    pub file_name: String,
    pub mime_type: String,
    pub payload: Vec<u8>,
    /// What the file is, e.g. `trip_proof` or `kyc_document`
    pub purpose: String,
    /// Kind of business object the upload belongs to, e.g. `trip`
    pub entity_type: String,
    pub entity_id: EntityId,
    pub idempotency_key: IdempotencyKey,
}

impl NewUploadItem {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: UploadId,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        payload: Vec<u8>,
        purpose: impl Into<String>,
        entity_type: impl Into<String>,
        entity_id: EntityId,
    ) -> Self {
        Self {
            id,
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            payload,
            purpose: purpose.into(),
            entity_type: entity_type.into(),
            entity_id,
            idempotency_key: IdempotencyKey::new(),
        }
    }

    pub fn with_idempotency_key(mut self, key: IdempotencyKey) -> Self {
        self.idempotency_key = key;
        self
    }
}

/// One durable record per queued file.
///
/// Lives in the queue store from enqueue until a confirmed remote upload
/// or an explicit user cancellation; never silently dropped. The payload
/// is never mutated after creation, and the idempotency key is stable
/// across all attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadItem {
    pub id: UploadId,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    /// Raw file bytes; skipped when the record is projected to JSON for
    /// a UI shell, which only needs the metadata.
    #[serde(skip_serializing, default)]
    pub payload: Vec<u8>,
    pub purpose: String,
    pub entity_type: String,
    pub entity_id: EntityId,
    pub idempotency_key: IdempotencyKey,
    pub status: UploadStatus,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub enqueued_at_ms: i64,
    pub updated_at_ms: i64,
}

impl UploadItem {
    /// Build the store record for a freshly enqueued upload.
    ///
    /// `size_bytes` is derived from the payload so the two can never
    /// disagree.
    pub fn enqueued(new: NewUploadItem, now_ms: i64) -> Self {
        let size_bytes = new.payload.len() as i64;
        Self {
            id: new.id,
            file_name: new.file_name,
            mime_type: new.mime_type,
            size_bytes,
            payload: new.payload,
            purpose: new.purpose,
            entity_type: new.entity_type,
            entity_id: new.entity_id,
            idempotency_key: new.idempotency_key,
            status: UploadStatus::Pending,
            attempts: 0,
            last_error: None,
            enqueued_at_ms: now_ms,
            updated_at_ms: now_ms,
        }
    }
}
