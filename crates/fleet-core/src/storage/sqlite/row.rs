//! Row mapping for the drivers and fuel_records tables.

use rusqlite::Row;

use crate::storage::types::{Driver, FuelRecord};

pub const DRIVER_COLUMNS: &str = "id, name, plate, vehicle_class, fuel_type";

pub const FUEL_RECORD_COLUMNS: &str = "id, driver_id, date, plate, fuel_cost, kilometer, \
     fuel_type, granit, keramik, service_type, service_cost";

/// Map a row selected with `DRIVER_COLUMNS`.
pub fn driver_from_row(row: &Row<'_>) -> rusqlite::Result<Driver> {
    Ok(Driver {
        id: row.get(0)?,
        name: row.get(1)?,
        plate: row.get(2)?,
        vehicle_class: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        fuel_type: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
    })
}

/// Map a row selected with `FUEL_RECORD_COLUMNS`.
///
/// Numeric columns written by older tools may hold NULL; they read as zero.
pub fn fuel_record_from_row(row: &Row<'_>) -> rusqlite::Result<FuelRecord> {
    Ok(FuelRecord {
        id: row.get(0)?,
        driver_id: row.get(1)?,
        date: row.get(2)?,
        plate: row.get(3)?,
        fuel_cost: row.get::<_, Option<f64>>(4)?.unwrap_or(0.0),
        kilometer: row.get::<_, Option<f64>>(5)?.unwrap_or(0.0),
        fuel_type: row.get::<_, Option<String>>(6)?.unwrap_or_default(),
        granit: row.get::<_, Option<f64>>(7)?.unwrap_or(0.0),
        keramik: row.get::<_, Option<f64>>(8)?.unwrap_or(0.0),
        service_type: row.get::<_, Option<String>>(9)?.unwrap_or_default(),
        service_cost: row.get::<_, Option<f64>>(10)?.unwrap_or(0.0),
    })
}
