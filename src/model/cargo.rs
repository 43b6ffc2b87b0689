//! Cargo: the shipment that tracking waypoints belong to.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered cargo shipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cargo {
    pub id: Uuid,

    /// Waybill reference printed on the shipment (e.g. `176-12345675`).
    /// Unique across all cargo.
    pub reference: String,

    /// Who the shipment is for.
    pub customer: String,

    pub origin: String,
    pub destination: String,

    pub created_at: Timestamp,
}

impl Cargo {
    /// First eight characters of the id, as shown in listings.
    pub fn short_id(&self) -> String {
        self.id.to_string()[..8].to_string()
    }
}
