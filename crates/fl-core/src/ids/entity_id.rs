use serde::{Deserialize, Serialize};

/// Identifier of the business object an upload is attached to
/// (a trip, an order, a KYC application).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(String);

crate::ids::impl_id!(EntityId);
