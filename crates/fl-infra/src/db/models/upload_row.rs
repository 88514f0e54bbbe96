use crate::db::schema::t_upload_queue;
use diesel::prelude::*;

#[derive(Queryable)]
#[diesel(table_name = t_upload_queue)]
pub struct UploadRow {
    pub seq: i64,
    pub id: String,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub payload: Vec<u8>,
    pub purpose: String,
    pub entity_type: String,
    pub entity_id: String,
    pub idempotency_key: String,
    pub status: String,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub enqueued_at_ms: i64,
    pub updated_at_ms: i64,
}

#[derive(Insertable)]
#[diesel(table_name = t_upload_queue)]
pub struct NewUploadRow {
    pub id: String,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub payload: Vec<u8>,
    pub purpose: String,
    pub entity_type: String,
    pub entity_id: String,
    pub idempotency_key: String,
    pub status: String,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub enqueued_at_ms: i64,
    pub updated_at_ms: i64,
}
