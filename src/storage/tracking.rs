//! Tracking storage: record, update, and list waypoints for a cargo.
//!
//! Waypoints come back in the order they were recorded; each waypoint's
//! statuses in the order they were attached. There is no delete.

use std::collections::HashSet;

use jiff::Timestamp;
use log::{debug, info};
use rusqlite::{OptionalExtension, Row};
use uuid::Uuid;

use crate::form::MAX_STATUSES;
use crate::model::{CargoTracking, LuggageStatus, StatusCode, TrackingSubmission};
use crate::session::TrackingBackend;

use super::{Result, Storage, StorageError, parse_timestamp, parse_uuid};

const TRACKING_COLUMNS: &str =
    "id, cargo_id, location, description, created_by, created_at, updated_at";

const INSERT_STATUS: &str =
    "INSERT INTO tracking_status (tracking_id, status, created_at) VALUES (?1, ?2, ?3)";

impl Storage {
    /// Records a new waypoint, stamping it and each of its statuses with the current time.
    pub fn create_tracking(
        &self,
        submission: &TrackingSubmission,
        created_by: &str,
    ) -> Result<CargoTracking> {
        if submission.id.is_some() {
            return Err(StorageError::InvalidSubmission(
                "a new waypoint cannot carry an id".into(),
            ));
        }
        check_statuses(submission)?;
        // Fails with CargoNotFound before anything is written.
        self.load_cargo(submission.cargo_id)?;

        let id = Uuid::new_v4();
        let now = Timestamp::now();
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO tracking
                 (id, cargo_id, location, description, created_by, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            rusqlite::params![
                id.to_string(),
                submission.cargo_id.to_string(),
                submission.location,
                submission.description,
                created_by,
                now.to_string(),
            ],
        )?;
        for kind in &submission.statuses {
            tx.execute(
                INSERT_STATUS,
                rusqlite::params![id.to_string(), kind.as_str(), now.to_string()],
            )?;
        }
        tx.commit()?;

        info!(
            "recorded waypoint {id} on cargo {} by {created_by}",
            submission.cargo_id
        );
        self.load_tracking(id)
    }

    /// Updates a waypoint's text and status selection.
    ///
    /// Statuses that stay selected keep their original timestamps. Deselected
    /// ones are dropped; newly selected ones are stamped now.
    pub fn update_tracking(&self, submission: &TrackingSubmission) -> Result<CargoTracking> {
        let id = submission.id.ok_or_else(|| {
            StorageError::InvalidSubmission("an update must name the waypoint".into())
        })?;
        check_statuses(submission)?;

        let existing = self.load_tracking(id)?;
        if existing.cargo_id != submission.cargo_id {
            return Err(StorageError::InvalidSubmission(format!(
                "waypoint {id} belongs to cargo {}, not {}",
                existing.cargo_id, submission.cargo_id
            )));
        }

        let now = Timestamp::now();
        let selected: HashSet<&str> = submission.statuses.iter().map(|k| k.as_str()).collect();
        let kept: HashSet<&str> = existing
            .history
            .iter()
            .map(|s| s.status.as_str())
            .filter(|s| selected.contains(s))
            .collect();

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "UPDATE tracking SET location = ?1, description = ?2, updated_at = ?3 WHERE id = ?4",
            rusqlite::params![
                submission.location,
                submission.description,
                now.to_string(),
                id.to_string(),
            ],
        )?;
        for status in &existing.history {
            let code = status.status.as_str();
            if !selected.contains(code) {
                tx.execute(
                    "DELETE FROM tracking_status WHERE tracking_id = ?1 AND status = ?2",
                    rusqlite::params![id.to_string(), code],
                )?;
            }
        }
        for kind in &submission.statuses {
            if !kept.contains(kind.as_str()) {
                tx.execute(
                    INSERT_STATUS,
                    rusqlite::params![id.to_string(), kind.as_str(), now.to_string()],
                )?;
            }
        }
        tx.commit()?;

        info!("updated waypoint {id} on cargo {}", submission.cargo_id);
        self.load_tracking(id)
    }

    /// Loads a single waypoint with its status history.
    pub fn load_tracking(&self, id: Uuid) -> Result<CargoTracking> {
        let sql = format!("SELECT {TRACKING_COLUMNS} FROM tracking WHERE id = ?1");
        let raw = self
            .conn
            .query_row(&sql, [id.to_string()], RawTracking::from_row)
            .optional()?
            .ok_or(StorageError::TrackingNotFound(id))?;
        let history = self.load_history(&raw.id)?;
        raw.into_tracking(history)
    }

    /// All waypoints for a cargo, in the order they were recorded.
    pub fn list_tracking(&self, cargo_id: Uuid) -> Result<Vec<CargoTracking>> {
        self.load_cargo(cargo_id)?;

        let sql = format!(
            "SELECT {TRACKING_COLUMNS} FROM tracking WHERE cargo_id = ?1 ORDER BY rowid"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let raws = stmt
            .query_map([cargo_id.to_string()], RawTracking::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut waypoints = Vec::with_capacity(raws.len());
        for raw in raws {
            let history = self.load_history(&raw.id)?;
            waypoints.push(raw.into_tracking(history)?);
        }
        let count = waypoints.len();
        debug!("loaded {count} waypoint(s) for cargo {cargo_id}");
        Ok(waypoints)
    }

    fn load_history(&self, tracking_id: &str) -> Result<Vec<LuggageStatus>> {
        let mut stmt = self.conn.prepare(
            "SELECT status, created_at FROM tracking_status WHERE tracking_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map([tracking_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(status, created_at)| {
                Ok(LuggageStatus {
                    status: StatusCode::from(status),
                    created_at: created_at
                        .as_deref()
                        .map(|s| parse_timestamp(s, "status created_at"))
                        .transpose()?,
                })
            })
            .collect()
    }
}

impl TrackingBackend for Storage {
    type Error = StorageError;

    fn fetch_tracking(&self, cargo_id: Uuid) -> Result<Vec<CargoTracking>> {
        self.list_tracking(cargo_id)
    }

    fn create_tracking(
        &self,
        submission: &TrackingSubmission,
        created_by: &str,
    ) -> Result<CargoTracking> {
        Storage::create_tracking(self, submission, created_by)
    }

    fn update_tracking(&self, submission: &TrackingSubmission) -> Result<CargoTracking> {
        Storage::update_tracking(self, submission)
    }
}

/// Rejects selections the form would never produce.
fn check_statuses(submission: &TrackingSubmission) -> Result<()> {
    let count = submission.statuses.len();
    if count == 0 || count > MAX_STATUSES {
        return Err(StorageError::InvalidSubmission(format!(
            "expected 1 to {MAX_STATUSES} statuses, got {count}"
        )));
    }
    let distinct: HashSet<_> = submission.statuses.iter().collect();
    if distinct.len() != count {
        return Err(StorageError::InvalidSubmission("duplicate statuses".into()));
    }
    Ok(())
}

/// A tracking row before its ids and timestamps are parsed.
struct RawTracking {
    id: String,
    cargo_id: String,
    location: Option<String>,
    description: Option<String>,
    created_by: String,
    created_at: String,
    updated_at: String,
}

impl RawTracking {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            cargo_id: row.get(1)?,
            location: row.get(2)?,
            description: row.get(3)?,
            created_by: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }

    fn into_tracking(self, history: Vec<LuggageStatus>) -> Result<CargoTracking> {
        Ok(CargoTracking {
            id: parse_uuid(&self.id, "tracking id")?,
            cargo_id: parse_uuid(&self.cargo_id, "tracking cargo_id")?,
            location: self.location,
            description: self.description,
            created_by: self.created_by,
            created_at: parse_timestamp(&self.created_at, "tracking created_at")?,
            updated_at: parse_timestamp(&self.updated_at, "tracking updated_at")?,
            history,
        })
    }
}
