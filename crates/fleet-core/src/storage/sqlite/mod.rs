//! SQLite storage backend.
//!
//! The store image is a single SQLite file. Each operation opens its own
//! connection, runs inside its own transaction, and closes the connection
//! before returning, so no lock outlives a call and a restored image is
//! picked up by the next call. The default rollback journal is kept: every
//! committed write lives in the main file, which is what the backup manager
//! copies.

mod row;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, OptionalExtension, ToSql, TransactionBehavior};
use tracing::{debug, info};

use crate::error::{FleetError, Result};
use crate::storage::traits::LedgerStore;
use crate::storage::types::{
    DateRange, Driver, DriverDraft, FuelRecord, FuelRecordPatch, NewFuelRecord,
};

use row::{driver_from_row, fuel_record_from_row, DRIVER_COLUMNS, FUEL_RECORD_COLUMNS};

/// Meta key set once the initial driver seed has been applied to an image.
const SEEDED_KEY: &str = "drivers_seeded";

/// How long a writer waits for another writer's lock before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS drivers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        plate TEXT NOT NULL UNIQUE,
        vehicle_class TEXT NOT NULL DEFAULT '',
        fuel_type TEXT NOT NULL DEFAULT ''
    );

    CREATE TABLE IF NOT EXISTS fuel_records (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        driver_id INTEGER NOT NULL,
        date TEXT NOT NULL,
        plate TEXT NOT NULL,
        fuel_cost REAL NOT NULL DEFAULT 0,
        kilometer REAL NOT NULL DEFAULT 0,
        fuel_type TEXT NOT NULL DEFAULT '',
        granit REAL NOT NULL DEFAULT 0,
        keramik REAL NOT NULL DEFAULT 0,
        service_type TEXT NOT NULL DEFAULT '',
        service_cost REAL NOT NULL DEFAULT 0,

        FOREIGN KEY (driver_id) REFERENCES drivers (id) ON DELETE CASCADE
    );

    CREATE INDEX IF NOT EXISTS idx_fuel_records_driver_date
    ON fuel_records (driver_id, date);

    CREATE TABLE IF NOT EXISTS meta (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
"#;

/// SQLite-backed ledger store.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Open (or create) the store image at `path` and ensure the schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let store = Self {
            path: path.to_path_buf(),
        };
        let conn = store.connect()?;
        conn.execute_batch(SCHEMA)?;
        debug!(path = %path.display(), "ledger store opened");
        Ok(store)
    }

    /// Path of the store image on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }
}

fn mark_seeded(conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO meta (key, value) VALUES (?, '1')",
        [SEEDED_KEY],
    )?;
    Ok(())
}

fn is_constraint(err: &rusqlite::Error, extended_code: i32) -> bool {
    matches!(err, rusqlite::Error::SqliteFailure(e, _) if e.extended_code == extended_code)
}

/// Classify a failed driver write: unique violations become `DuplicatePlate`.
fn driver_write_error(err: rusqlite::Error, plate: &str) -> FleetError {
    if is_constraint(&err, rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE) {
        FleetError::DuplicatePlate(plate.to_string())
    } else {
        err.into()
    }
}

fn validate_amount(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(FleetError::InvalidInput(format!(
            "{} must be a non-negative number (got {})",
            field, value
        )));
    }
    Ok(())
}

fn validate_new_record(record: &NewFuelRecord) -> Result<()> {
    validate_amount("fuel_cost", record.fuel_cost)?;
    validate_amount("kilometer", record.kilometer)?;
    if record.date.trim().is_empty() {
        return Err(FleetError::InvalidInput("date is required".to_string()));
    }
    Ok(())
}

fn validate_patch(patch: &FuelRecordPatch) -> Result<()> {
    if patch.is_empty() {
        return Err(FleetError::InvalidInput("Nothing to update".to_string()));
    }
    if let Some(fuel_cost) = patch.fuel_cost {
        validate_amount("fuel_cost", fuel_cost)?;
    }
    if let Some(kilometer) = patch.kilometer {
        validate_amount("kilometer", kilometer)?;
    }
    if matches!(patch.date, Some(ref date) if date.trim().is_empty()) {
        return Err(FleetError::InvalidInput("date is required".to_string()));
    }
    Ok(())
}

impl LedgerStore for SqliteStore {
    fn list_drivers(&self) -> Result<Vec<Driver>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM drivers ORDER BY id",
            DRIVER_COLUMNS
        ))?;
        let rows = stmt.query_map([], driver_from_row)?;
        let drivers = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(drivers)
    }

    fn get_driver(&self, id: i64) -> Result<Option<Driver>> {
        let conn = self.connect()?;
        let driver = conn
            .query_row(
                &format!("SELECT {} FROM drivers WHERE id = ?", DRIVER_COLUMNS),
                [id],
                driver_from_row,
            )
            .optional()?;
        Ok(driver)
    }

    fn reconcile_drivers(&self, drivers: &[DriverDraft]) -> Result<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing: BTreeSet<i64> = {
            let mut stmt = tx.prepare("SELECT id FROM drivers")?;
            let ids = stmt
                .query_map([], |row| row.get(0))?
                .collect::<rusqlite::Result<BTreeSet<i64>>>()?;
            ids
        };
        let submitted: BTreeSet<i64> = drivers.iter().filter_map(|d| d.id).collect();

        let mut updated = 0usize;
        let mut inserted = 0usize;
        for driver in drivers {
            match driver.id {
                Some(id) if existing.contains(&id) => {
                    tx.execute(
                        "UPDATE drivers SET name = ?, plate = ?, vehicle_class = ?, fuel_type = ? WHERE id = ?",
                        (
                            &driver.name,
                            &driver.plate,
                            &driver.vehicle_class,
                            &driver.fuel_type,
                            id,
                        ),
                    )
                    .map_err(|e| driver_write_error(e, &driver.plate))?;
                    updated += 1;
                }
                _ => {
                    tx.execute(
                        "INSERT INTO drivers (name, plate, vehicle_class, fuel_type) VALUES (?, ?, ?, ?)",
                        (
                            &driver.name,
                            &driver.plate,
                            &driver.vehicle_class,
                            &driver.fuel_type,
                        ),
                    )
                    .map_err(|e| driver_write_error(e, &driver.plate))?;
                    inserted += 1;
                }
            }
        }

        let removed: Vec<i64> = existing.difference(&submitted).copied().collect();
        for id in &removed {
            tx.execute("DELETE FROM drivers WHERE id = ?", [id])?;
        }

        tx.commit()?;
        info!(
            updated,
            inserted,
            removed = removed.len(),
            "driver set reconciled"
        );
        Ok(())
    }

    fn seed_drivers(&self, drivers: &[DriverDraft]) -> Result<usize> {
        if drivers.is_empty() {
            return Ok(0);
        }
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let seeded: Option<String> = tx
            .query_row("SELECT value FROM meta WHERE key = ?", [SEEDED_KEY], |row| {
                row.get(0)
            })
            .optional()?;
        if seeded.is_some() {
            return Ok(0);
        }

        // An image that already has drivers counts as seeded.
        let count: i64 = tx.query_row("SELECT COUNT(*) FROM drivers", [], |row| row.get(0))?;
        if count > 0 {
            mark_seeded(&tx)?;
            tx.commit()?;
            return Ok(0);
        }

        for driver in drivers {
            tx.execute(
                "INSERT INTO drivers (name, plate, vehicle_class, fuel_type) VALUES (?, ?, ?, ?)",
                (
                    &driver.name,
                    &driver.plate,
                    &driver.vehicle_class,
                    &driver.fuel_type,
                ),
            )
            .map_err(|e| driver_write_error(e, &driver.plate))?;
        }

        mark_seeded(&tx)?;
        tx.commit()?;
        info!(count = drivers.len(), "seeded initial drivers");
        Ok(drivers.len())
    }

    fn insert_fuel_record(&self, record: &NewFuelRecord) -> Result<i64> {
        validate_new_record(record)?;

        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let exists: Option<i64> = tx
            .query_row(
                "SELECT id FROM drivers WHERE id = ?",
                [record.driver_id],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_none() {
            return Err(FleetError::ForeignKeyViolation(record.driver_id));
        }

        tx.execute(
            r#"
            INSERT INTO fuel_records (
                driver_id,
                date,
                plate,
                fuel_cost,
                kilometer,
                fuel_type,
                granit,
                keramik,
                service_type,
                service_cost
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            (
                record.driver_id,
                &record.date,
                &record.plate,
                record.fuel_cost,
                record.kilometer,
                &record.fuel_type,
                record.granit,
                record.keramik,
                &record.service_type,
                record.service_cost,
            ),
        )
        .map_err(|e| {
            if is_constraint(&e, rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY) {
                FleetError::ForeignKeyViolation(record.driver_id)
            } else {
                e.into()
            }
        })?;
        let id = tx.last_insert_rowid();

        tx.commit()?;
        debug!(id, driver_id = record.driver_id, "fuel record inserted");
        Ok(id)
    }

    fn get_fuel_record(&self, id: i64) -> Result<Option<FuelRecord>> {
        let conn = self.connect()?;
        let record = conn
            .query_row(
                &format!(
                    "SELECT {} FROM fuel_records WHERE id = ?",
                    FUEL_RECORD_COLUMNS
                ),
                [id],
                fuel_record_from_row,
            )
            .optional()?;
        Ok(record)
    }

    fn query_fuel_records(
        &self,
        driver_id: i64,
        range: Option<&DateRange>,
    ) -> Result<Vec<FuelRecord>> {
        let conn = self.connect()?;

        let mut query = format!(
            "SELECT {} FROM fuel_records WHERE driver_id = ?",
            FUEL_RECORD_COLUMNS
        );
        let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(driver_id)];
        if let Some(range) = range {
            query.push_str(" AND date BETWEEN ? AND ?");
            params.push(Box::new(range.start.clone()));
            params.push(Box::new(range.end.clone()));
        }
        query.push_str(" ORDER BY date DESC, id DESC");

        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(params.iter()),
            fuel_record_from_row,
        )?;
        let records = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    fn update_fuel_record(&self, id: i64, patch: &FuelRecordPatch) -> Result<usize> {
        validate_patch(patch)?;

        let mut assignments: Vec<&str> = Vec::new();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(ref date) = patch.date {
            assignments.push("date = ?");
            params.push(Box::new(date.clone()));
        }
        if let Some(fuel_cost) = patch.fuel_cost {
            assignments.push("fuel_cost = ?");
            params.push(Box::new(fuel_cost));
        }
        if let Some(kilometer) = patch.kilometer {
            assignments.push("kilometer = ?");
            params.push(Box::new(kilometer));
        }
        if let Some(ref fuel_type) = patch.fuel_type {
            assignments.push("fuel_type = ?");
            params.push(Box::new(fuel_type.clone()));
        }
        if let Some(granit) = patch.granit {
            assignments.push("granit = ?");
            params.push(Box::new(granit));
        }
        if let Some(keramik) = patch.keramik {
            assignments.push("keramik = ?");
            params.push(Box::new(keramik));
        }
        if let Some(ref service_type) = patch.service_type {
            assignments.push("service_type = ?");
            params.push(Box::new(service_type.clone()));
        }
        if let Some(service_cost) = patch.service_cost {
            assignments.push("service_cost = ?");
            params.push(Box::new(service_cost));
        }
        params.push(Box::new(id));

        let query = format!(
            "UPDATE fuel_records SET {} WHERE id = ?",
            assignments.join(", ")
        );

        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let affected = tx.execute(&query, rusqlite::params_from_iter(params.iter()))?;
        tx.commit()?;

        debug!(id, affected, "fuel record updated");
        Ok(affected)
    }

    fn delete_fuel_record(&self, id: i64) -> Result<usize> {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let affected = tx.execute("DELETE FROM fuel_records WHERE id = ?", [id])?;
        tx.commit()?;

        debug!(id, affected, "fuel record deleted");
        Ok(affected)
    }

    fn check_integrity(&self) -> Result<()> {
        let conn = self.connect()?;

        let status: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
        if status != "ok" {
            return Err(FleetError::Storage(format!(
                "Integrity check failed: {}",
                status
            )));
        }

        let mut stmt = conn.prepare("PRAGMA foreign_key_check")?;
        let mut rows = stmt.query([])?;
        if rows.next()?.is_some() {
            return Err(FleetError::Storage(
                "Foreign key integrity check failed".to_string(),
            ));
        }

        Ok(())
    }
}
