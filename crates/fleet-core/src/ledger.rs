//! Boundary facade over the store, backups, prices, and export.
//!
//! Front ends talk to [`FleetLedger`] only. Every successful mutation is
//! followed by the once-per-day automatic backup; if that backup fails the
//! mutation stays committed and the failure is returned as
//! `FleetError::Storage`.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::backup::{BackupCategory, BackupFile, BackupManager};
use crate::error::{FleetError, Result};
use crate::export::{ExportComposer, ExportSheet};
use crate::prices::PriceSource;
use crate::stats::{compute_stats, FuelStats};
use crate::storage::traits::LedgerStore;
use crate::storage::types::{
    DateRange, Driver, DriverDraft, FuelRecord, FuelRecordPatch, NewFuelRecord,
};

/// The fleet ledger as seen by a request-handling layer.
pub struct FleetLedger<S, P> {
    store: S,
    backups: BackupManager,
    prices: P,
    composer: ExportComposer,
}

impl<S: LedgerStore, P: PriceSource> FleetLedger<S, P> {
    pub fn new(store: S, backups: BackupManager, prices: P, composer: ExportComposer) -> Self {
        Self {
            store,
            backups,
            prices,
            composer,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    fn after_mutation(&self) -> Result<()> {
        self.backups
            .create_backup(BackupCategory::AutoDaily, false)
            .map(|_| ())
            .map_err(|err| {
                warn!(error = %err, "automatic daily backup failed");
                FleetError::Storage(format!(
                    "Change was saved, but the automatic backup failed: {}",
                    err
                ))
            })
    }

    pub fn drivers(&self) -> Result<Vec<Driver>> {
        self.store.list_drivers()
    }

    pub fn driver(&self, id: i64) -> Result<Driver> {
        self.store
            .get_driver(id)?
            .ok_or_else(|| FleetError::NotFound(format!("Driver {}", id)))
    }

    pub fn reconcile_drivers(&self, drivers: &[DriverDraft]) -> Result<Vec<Driver>> {
        self.store.reconcile_drivers(drivers)?;
        self.after_mutation()?;
        self.store.list_drivers()
    }

    pub fn records(&self, driver_id: i64, range: Option<&DateRange>) -> Result<Vec<FuelRecord>> {
        self.store.query_fuel_records(driver_id, range)
    }

    /// Insert a record and return it as stored.
    pub fn add_record(&self, record: &NewFuelRecord) -> Result<FuelRecord> {
        let id = self.store.insert_fuel_record(record)?;
        self.after_mutation()?;
        self.stored_record(id)
    }

    /// Apply a patch and return the record as stored.
    pub fn update_record(&self, id: i64, patch: &FuelRecordPatch) -> Result<FuelRecord> {
        if self.store.update_fuel_record(id, patch)? == 0 {
            return Err(FleetError::NotFound(format!("Fuel record {}", id)));
        }
        self.after_mutation()?;
        self.stored_record(id)
    }

    pub fn delete_record(&self, id: i64) -> Result<()> {
        if self.store.delete_fuel_record(id)? == 0 {
            return Err(FleetError::NotFound(format!("Fuel record {}", id)));
        }
        self.after_mutation()?;
        Ok(())
    }

    fn stored_record(&self, id: i64) -> Result<FuelRecord> {
        self.store
            .get_fuel_record(id)?
            .ok_or_else(|| FleetError::NotFound(format!("Fuel record {}", id)))
    }

    /// Statistics for one driver, priced with a freshly loaded price table.
    pub fn stats(&self, driver_id: i64, range: Option<&DateRange>) -> Result<FuelStats> {
        let records = self.store.query_fuel_records(driver_id, range)?;
        let prices = self.prices.load()?;
        Ok(compute_stats(&records, &prices))
    }

    /// Manual backup; always produces a new file.
    pub fn manual_backup(&self) -> Result<PathBuf> {
        self.backups
            .create_backup(BackupCategory::Manual, false)?
            .ok_or_else(|| FleetError::Storage("Manual backup was not created".to_string()))
    }

    /// Restore the store image; returns the rescue backup path.
    pub fn restore(&self, source: &Path) -> Result<PathBuf> {
        self.backups.restore(source)
    }

    pub fn list_backups(&self) -> Result<Vec<BackupFile>> {
        self.backups.list_backups()
    }

    pub fn export_driver(&self, driver_id: i64, range: Option<&DateRange>) -> Result<ExportSheet> {
        self.composer.driver_sheet(&self.store, driver_id, range)
    }

    pub fn export_all(&self, range: Option<&DateRange>) -> Result<Vec<ExportSheet>> {
        self.composer.all_driver_sheets(&self.store, range)
    }
}
