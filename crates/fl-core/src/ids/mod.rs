//! Typed identifiers shared across the domain.

mod entity_id;
mod id_macro;
mod idempotency_key;
mod upload_id;

pub use entity_id::EntityId;
pub use idempotency_key::IdempotencyKey;
pub use upload_id::UploadId;

pub(crate) use id_macro::impl_id;
