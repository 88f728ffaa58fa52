//! Tabular export of fuel records.
//!
//! The composer turns records into labeled rows; encoding is left to a
//! [`TabularWriter`]. [`CsvDirectoryWriter`] writes one CSV file per sheet.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{FleetError, Result};
use crate::storage::traits::LedgerStore;
use crate::storage::types::{DateRange, Driver, FuelRecord};

/// Material boxes a vehicle is expected to move per day.
pub const DEFAULT_DAILY_TARGET: f64 = 175.0;

/// Weight of one granite box relative to one ceramic box.
pub const GRANIT_WEIGHT: f64 = 1.5;

/// Longest sheet label the spreadsheet format accepts.
pub const MAX_SHEET_LABEL: usize = 31;

/// Label of the sheet in a single-driver export.
pub const SINGLE_SHEET_LABEL: &str = "VehicleData";

/// Column labels, in row order.
pub const EXPORT_COLUMNS: [&str; 9] = [
    "Date",
    "Plate",
    "Kilometer",
    "Fuel Cost",
    "Service Type",
    "Service Cost",
    "Granit (box)",
    "Keramik (box)",
    "Point",
];

/// One exported row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    /// `DD-MM-YYYY`
    pub date: String,
    pub plate: String,
    pub kilometer: f64,
    pub fuel_cost: f64,
    pub service_type: String,
    pub service_cost: f64,
    pub granit: f64,
    pub keramik: f64,
    pub point: f64,
}

impl ExportRow {
    /// Cell values in `EXPORT_COLUMNS` order.
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.date.clone(),
            self.plate.clone(),
            self.kilometer.to_string(),
            self.fuel_cost.to_string(),
            self.service_type.clone(),
            self.service_cost.to_string(),
            self.granit.to_string(),
            self.keramik.to_string(),
            self.point.to_string(),
        ]
    }
}

/// A labeled table ready for a writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSheet {
    pub label: String,
    pub driver_id: i64,
    pub rows: Vec<ExportRow>,
}

impl ExportSheet {
    pub fn write_to<W: TabularWriter + ?Sized>(&self, writer: &mut W) -> Result<()> {
        let cells: Vec<Vec<String>> = self.rows.iter().map(ExportRow::cells).collect();
        writer.write_sheet(&self.label, &EXPORT_COLUMNS, &cells)
    }
}

/// Productivity point for one day's loads.
pub fn point(granit: f64, keramik: f64, daily_target: f64) -> f64 {
    if daily_target > 0.0 {
        round2(((granit * GRANIT_WEIGHT) + keramik) / daily_target)
    } else {
        0.0
    }
}

/// Two decimals, ties to even on the scaled value.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// `YYYY-MM-DD` -> `DD-MM-YYYY`; anything unparsable is passed through.
pub fn format_export_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => parsed.format("%d-%m-%Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// Build export rows in record order.
pub fn compose_export_rows(records: &[FuelRecord], daily_target: f64) -> Vec<ExportRow> {
    records
        .iter()
        .map(|record| ExportRow {
            date: format_export_date(&record.date),
            plate: record.plate.clone(),
            kilometer: record.kilometer,
            fuel_cost: record.fuel_cost,
            service_type: record.service_type.clone(),
            service_cost: record.service_cost,
            granit: record.granit,
            keramik: record.keramik,
            point: point(record.granit, record.keramik, daily_target),
        })
        .collect()
}

/// Sheet label for a driver name: alphanumerics only, at most 31 characters.
pub fn sheet_label(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .take(MAX_SHEET_LABEL)
        .collect()
}

/// Pick a label for `driver` that is non-empty and not in `taken`.
fn unique_sheet_label(driver: &Driver, taken: &HashSet<String>) -> String {
    let base = match sheet_label(&driver.name) {
        label if label.is_empty() => format!("Driver{}", driver.id),
        label => label,
    };
    if !taken.contains(&base) {
        return base;
    }

    let mut n = 2usize;
    loop {
        let suffix = format!("_{}", n);
        let keep = MAX_SHEET_LABEL.saturating_sub(suffix.chars().count());
        let candidate: String = base.chars().take(keep).chain(suffix.chars()).collect();
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Builds export sheets from the store.
#[derive(Debug, Clone, Copy)]
pub struct ExportComposer {
    daily_target: f64,
}

impl Default for ExportComposer {
    fn default() -> Self {
        Self::new(DEFAULT_DAILY_TARGET)
    }
}

impl ExportComposer {
    pub fn new(daily_target: f64) -> Self {
        Self { daily_target }
    }

    pub fn daily_target(&self) -> f64 {
        self.daily_target
    }

    /// One sheet for one driver.
    ///
    /// # Errors
    ///
    /// Returns `FleetError::NotFound` if the selection has no records.
    pub fn driver_sheet<S: LedgerStore + ?Sized>(
        &self,
        store: &S,
        driver_id: i64,
        range: Option<&DateRange>,
    ) -> Result<ExportSheet> {
        let records = store.query_fuel_records(driver_id, range)?;
        if records.is_empty() {
            return Err(FleetError::NotFound(format!(
                "No records for driver {} in the selected range",
                driver_id
            )));
        }
        debug!(driver_id, rows = records.len(), "composed driver sheet");
        Ok(ExportSheet {
            label: SINGLE_SHEET_LABEL.to_string(),
            driver_id,
            rows: compose_export_rows(&records, self.daily_target),
        })
    }

    /// One sheet per driver that has records in the range, in driver id order.
    pub fn all_driver_sheets<S: LedgerStore + ?Sized>(
        &self,
        store: &S,
        range: Option<&DateRange>,
    ) -> Result<Vec<ExportSheet>> {
        let mut sheets = Vec::new();
        let mut taken = HashSet::new();
        for driver in store.list_drivers()? {
            let records = store.query_fuel_records(driver.id, range)?;
            if records.is_empty() {
                continue;
            }
            let label = unique_sheet_label(&driver, &taken);
            taken.insert(label.clone());
            sheets.push(ExportSheet {
                label,
                driver_id: driver.id,
                rows: compose_export_rows(&records, self.daily_target),
            });
        }
        info!(sheets = sheets.len(), "composed all-driver export");
        Ok(sheets)
    }
}

/// Encodes labeled tables.
pub trait TabularWriter {
    fn write_sheet(&mut self, label: &str, columns: &[&str], rows: &[Vec<String>]) -> Result<()>;
}

/// Writes each sheet to `{dir}/{label}.csv`.
#[derive(Debug)]
pub struct CsvDirectoryWriter {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl CsvDirectoryWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            written: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far, in write order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn into_written(self) -> Vec<PathBuf> {
        self.written
    }
}

impl TabularWriter for CsvDirectoryWriter {
    fn write_sheet(&mut self, label: &str, columns: &[&str], rows: &[Vec<String>]) -> Result<()> {
        let path = self.dir.join(format!("{}.csv", label));
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(columns)?;
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        debug!(path = %path.display(), rows = rows.len(), "sheet written");
        self.written.push(path);
        Ok(())
    }
}
