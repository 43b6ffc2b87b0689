//! Cargo storage: register, load, and list shipments.

use rusqlite::{OptionalExtension, Row};
use uuid::Uuid;

use crate::model::Cargo;

use super::{Result, Storage, StorageError, parse_timestamp, parse_uuid};

const CARGO_COLUMNS: &str = "id, reference, customer, origin, destination, created_at";

impl Storage {
    /// Registers a new cargo. References must be unique.
    pub fn create_cargo(&self, cargo: &Cargo) -> Result<()> {
        if self.find_cargo_by_reference(&cargo.reference)?.is_some() {
            return Err(StorageError::CargoAlreadyExists(cargo.reference.clone()));
        }
        self.conn.execute(
            "INSERT INTO cargo (id, reference, customer, origin, destination, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                cargo.id.to_string(),
                &cargo.reference,
                &cargo.customer,
                &cargo.origin,
                &cargo.destination,
                cargo.created_at.to_string(),
            ],
        )?;
        log::info!("registered cargo {} ({})", cargo.reference, cargo.id);
        Ok(())
    }

    /// Loads a single cargo by id.
    pub fn load_cargo(&self, id: Uuid) -> Result<Cargo> {
        let sql = format!("SELECT {CARGO_COLUMNS} FROM cargo WHERE id = ?1");
        let raw = self
            .conn
            .query_row(&sql, [id.to_string()], RawCargo::from_row)
            .optional()?
            .ok_or(StorageError::CargoNotFound(id))?;
        raw.into_cargo()
    }

    /// Looks up a cargo by its waybill reference (exact match).
    pub fn find_cargo_by_reference(&self, reference: &str) -> Result<Option<Cargo>> {
        let sql = format!("SELECT {CARGO_COLUMNS} FROM cargo WHERE reference = ?1");
        self.conn
            .query_row(&sql, [reference], RawCargo::from_row)
            .optional()?
            .map(RawCargo::into_cargo)
            .transpose()
    }

    /// Lists all cargo, oldest first.
    pub fn list_cargo(&self) -> Result<Vec<Cargo>> {
        let sql = format!("SELECT {CARGO_COLUMNS} FROM cargo ORDER BY rowid");
        let mut stmt = self.conn.prepare(&sql)?;
        let raws = stmt
            .query_map([], RawCargo::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        let mut cargo = raws
            .into_iter()
            .map(RawCargo::into_cargo)
            .collect::<Result<Vec<_>>>()?;
        cargo.sort_by_key(|c| c.created_at);
        Ok(cargo)
    }
}

/// A cargo row before its id and timestamp are parsed.
struct RawCargo {
    id: String,
    reference: String,
    customer: String,
    origin: String,
    destination: String,
    created_at: String,
}

impl RawCargo {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            reference: row.get(1)?,
            customer: row.get(2)?,
            origin: row.get(3)?,
            destination: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    fn into_cargo(self) -> Result<Cargo> {
        Ok(Cargo {
            id: parse_uuid(&self.id, "cargo id")?,
            reference: self.reference,
            customer: self.customer,
            origin: self.origin,
            destination: self.destination,
            created_at: parse_timestamp(&self.created_at, "cargo created_at")?,
        })
    }
}
