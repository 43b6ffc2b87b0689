//! Client-side tracking store for the cargo currently open.
//!
//! The collection is replaced wholesale on fetch, appended on create,
//! and patched by id on update. It never reorders: display order is the
//! order the backend returned or the order waypoints were appended.

use log::{debug, warn};
use uuid::Uuid;

use crate::model::CargoTracking;

/// The waypoints of one cargo, as last fetched or submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackingStore {
    cargo_id: Option<Uuid>,
    waypoints: Vec<CargoTracking>,
}

impl TrackingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cargo whose waypoints are held, if any.
    pub fn cargo_id(&self) -> Option<Uuid> {
        self.cargo_id
    }

    pub fn waypoints(&self) -> &[CargoTracking] {
        &self.waypoints
    }

    pub fn get(&self, index: usize) -> Option<&CargoTracking> {
        self.waypoints.get(index)
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Drops whatever is held and takes the freshly fetched list.
    pub fn replace(&mut self, cargo_id: Uuid, waypoints: Vec<CargoTracking>) {
        let count = waypoints.len();
        debug!("tracking store: {count} waypoint(s) for cargo {cargo_id}");
        self.cargo_id = Some(cargo_id);
        self.waypoints = waypoints;
    }

    /// Appends a newly created waypoint.
    ///
    /// Returns `false` and leaves the store untouched when the waypoint
    /// belongs to a different cargo.
    pub fn apply_created(&mut self, waypoint: CargoTracking) -> bool {
        if self.cargo_id != Some(waypoint.cargo_id) {
            warn!(
                "ignoring created waypoint {} for cargo {}: store holds {:?}",
                waypoint.id, waypoint.cargo_id, self.cargo_id
            );
            return false;
        }
        self.waypoints.push(waypoint);
        true
    }

    /// Replaces the waypoint with the same id, keeping its position.
    ///
    /// Returns `false` when no held waypoint matches.
    pub fn apply_updated(&mut self, waypoint: CargoTracking) -> bool {
        if let Some(slot) = self.waypoints.iter_mut().find(|w| w.id == waypoint.id) {
            *slot = waypoint;
            true
        } else {
            warn!("ignoring update for unknown waypoint {}", waypoint.id);
            false
        }
    }

    pub fn clear(&mut self) {
        self.cargo_id = None;
        self.waypoints.clear();
    }
}
