use anyhow::{anyhow, Result};
use fl_core::ids::{EntityId, IdempotencyKey, UploadId};
use fl_core::upload::{UploadItem, UploadStatus};

use crate::db::models::{NewUploadRow, UploadRow};
use crate::db::ports::{InsertMapper, RowMapper};

#[derive(Clone, Copy)]
pub struct UploadRowMapper;

impl InsertMapper<UploadItem, NewUploadRow> for UploadRowMapper {
    fn to_row(&self, item: &UploadItem) -> Result<NewUploadRow> {
        Ok(NewUploadRow {
            id: item.id.to_string(),
            file_name: item.file_name.clone(),
            mime_type: item.mime_type.clone(),
            size_bytes: item.size_bytes,
            payload: item.payload.clone(),
            purpose: item.purpose.clone(),
            entity_type: item.entity_type.clone(),
            entity_id: item.entity_id.to_string(),
            idempotency_key: item.idempotency_key.to_string(),
            status: item.status.as_str().to_string(),
            attempts: item.attempts,
            last_error: item.last_error.clone(),
            enqueued_at_ms: item.enqueued_at_ms,
            updated_at_ms: item.updated_at_ms,
        })
    }
}

impl RowMapper<UploadRow, UploadItem> for UploadRowMapper {
    fn to_domain(&self, row: &UploadRow) -> Result<UploadItem> {
        let status = UploadStatus::parse(&row.status)
            .ok_or_else(|| anyhow!("unknown upload status {:?} for {}", row.status, row.id))?;

        Ok(UploadItem {
            id: UploadId::from_string(row.id.clone()),
            file_name: row.file_name.clone(),
            mime_type: row.mime_type.clone(),
            size_bytes: row.size_bytes,
            payload: row.payload.clone(),
            purpose: row.purpose.clone(),
            entity_type: row.entity_type.clone(),
            entity_id: EntityId::from_string(row.entity_id.clone()),
            idempotency_key: IdempotencyKey::from_string(row.idempotency_key.clone()),
            status,
            attempts: row.attempts,
            last_error: row.last_error.clone(),
            enqueued_at_ms: row.enqueued_at_ms,
            updated_at_ms: row.updated_at_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fl_core::upload::NewUploadItem;

    fn sample_item() -> UploadItem {
        let new = NewUploadItem::new(
            UploadId::from("upload-1"),
            "receipt.png",
            "image/png",
            vec![1, 2, 3, 4],
            "delivery_receipt",
            "order",
            EntityId::from("order-9"),
        );
        UploadItem::enqueued(new, 1_700_000_000_000)
    }

    #[test]
    fn round_trips_through_rows() {
        let mapper = UploadRowMapper;
        let item = sample_item();

        let new_row = mapper.to_row(&item).expect("to_row");
        let row = UploadRow {
            seq: 1,
            id: new_row.id,
            file_name: new_row.file_name,
            mime_type: new_row.mime_type,
            size_bytes: new_row.size_bytes,
            payload: new_row.payload,
            purpose: new_row.purpose,
            entity_type: new_row.entity_type,
            entity_id: new_row.entity_id,
            idempotency_key: new_row.idempotency_key,
            status: new_row.status,
            attempts: new_row.attempts,
            last_error: new_row.last_error,
            enqueued_at_ms: new_row.enqueued_at_ms,
            updated_at_ms: new_row.updated_at_ms,
        };

        let restored = mapper.to_domain(&row).expect("to_domain");
        assert_eq!(restored, item);
    }

    #[test]
    fn rejects_unknown_status() {
        let mapper = UploadRowMapper;
        let item = sample_item();
        let new_row = mapper.to_row(&item).expect("to_row");
        let row = UploadRow {
            seq: 1,
            id: new_row.id,
            file_name: new_row.file_name,
            mime_type: new_row.mime_type,
            size_bytes: new_row.size_bytes,
            payload: new_row.payload,
            purpose: new_row.purpose,
            entity_type: new_row.entity_type,
            entity_id: new_row.entity_id,
            idempotency_key: new_row.idempotency_key,
            status: "exploded".to_string(),
            attempts: new_row.attempts,
            last_error: new_row.last_error,
            enqueued_at_ms: new_row.enqueued_at_ms,
            updated_at_ms: new_row.updated_at_ms,
        };

        assert!(mapper.to_domain(&row).is_err());
    }
}
