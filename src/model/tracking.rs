//! Tracking waypoints: one recorded event along a cargo's route.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::{LuggageStatus, StatusKind};

/// A recorded tracking waypoint, as returned by the backend.
///
/// The id and timestamps are assigned on creation. A waypoint that only
/// exists on the client is a [`TrackingSubmission`] without an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CargoTracking {
    pub id: Uuid,
    pub cargo_id: Uuid,

    /// Where the cargo was when this was recorded.
    pub location: Option<String>,

    /// Free-text note from the operator.
    pub description: Option<String>,

    /// Operator who recorded the waypoint.
    pub created_by: String,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,

    /// Status tags attached to this waypoint, in the order they were recorded.
    /// Submissions carry 1 to 3; stored data is not trusted to.
    #[serde(default)]
    pub history: Vec<LuggageStatus>,
}

/// What the tracking form sends: a create when `id` is `None`,
/// otherwise an update of that waypoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingSubmission {
    pub id: Option<Uuid>,
    pub cargo_id: Uuid,
    pub location: Option<String>,
    pub description: Option<String>,

    /// Selected status tags: 1 to 3, no duplicates.
    pub statuses: Vec<StatusKind>,
}

impl TrackingSubmission {
    pub fn is_update(&self) -> bool {
        self.id.is_some()
    }
}
