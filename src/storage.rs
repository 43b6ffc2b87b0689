//! Local persistence for cargo and tracking waypoints.
//!
//! Everything lives in one `SQLite` file under the storage root:
//!
//! ```text
//! <root>/
//!   waybill.sqlite   # cargo, tracking, tracking_status tables
//! ```
//!
//! Storage plays the backend's part: it assigns waypoint ids and
//! timestamps, and hands back records as stored.

mod cargo;
mod tracking;

use std::{fs, io, path::PathBuf};

use log::debug;
use rusqlite::Connection;
use uuid::Uuid;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("cargo not found: {0}")]
    CargoNotFound(Uuid),

    #[error("cargo already exists: {0}")]
    CargoAlreadyExists(String),

    #[error("tracking waypoint not found: {0}")]
    TrackingNotFound(Uuid),

    #[error("invalid submission: {0}")]
    InvalidSubmission(String),

    #[error("corrupt data: {0}")]
    Corrupt(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = core::result::Result<T, StorageError>;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS cargo (
    id          TEXT PRIMARY KEY,
    reference   TEXT NOT NULL UNIQUE,
    customer    TEXT NOT NULL,
    origin      TEXT NOT NULL,
    destination TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tracking (
    id          TEXT PRIMARY KEY,
    cargo_id    TEXT NOT NULL REFERENCES cargo(id),
    location    TEXT,
    description TEXT,
    created_by  TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS tracking_by_cargo ON tracking(cargo_id);

CREATE TABLE IF NOT EXISTS tracking_status (
    tracking_id TEXT NOT NULL REFERENCES tracking(id),
    status      TEXT NOT NULL,
    created_at  TEXT
);

CREATE INDEX IF NOT EXISTS status_by_tracking ON tracking_status(tracking_id);
";

/// `SQLite`-backed storage for cargo and their tracking history.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Opens (or creates) the database under `root`.
    ///
    /// The directory is created if it doesn't exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let path = root.join("waybill.sqlite");
        debug!("opening database at {}", path.display());
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Returns the default storage root: `~/.waybill/`.
    pub fn default_root() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".waybill"))
    }
}

/// Parses a UUID column, reporting which column was bad.
fn parse_uuid(value: &str, column: &str) -> Result<Uuid> {
    value
        .parse()
        .map_err(|e| StorageError::Corrupt(format!("invalid {column}: {e}")))
}

/// Parses a timestamp column, reporting which column was bad.
fn parse_timestamp(value: &str, column: &str) -> Result<jiff::Timestamp> {
    value
        .parse()
        .map_err(|e| StorageError::Corrupt(format!("invalid {column}: {e}")))
}
