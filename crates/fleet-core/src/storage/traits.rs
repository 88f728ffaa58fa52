//! Ledger store trait definition.
//!
//! The `LedgerStore` trait is the seam between the boundary facade and the
//! durable backend. Every call is self-contained: implementations acquire
//! their connection and transaction inside the call and release both before
//! returning.

use super::types::{DateRange, Driver, DriverDraft, FuelRecord, FuelRecordPatch, NewFuelRecord};
use crate::error::Result;

/// Durable store for drivers and their fuel records.
pub trait LedgerStore: Send + Sync {
    /// List all drivers, ordered by id ascending.
    fn list_drivers(&self) -> Result<Vec<Driver>>;

    /// Get a driver by id.
    fn get_driver(&self, id: i64) -> Result<Option<Driver>>;

    /// Replace the driver set.
    ///
    /// Drafts whose id exists are updated in place, the rest are inserted,
    /// and every existing driver whose id was not submitted is deleted along
    /// with its fuel records. Runs as one transaction.
    ///
    /// # Errors
    ///
    /// Returns `FleetError::DuplicatePlate` if two drivers would end up with
    /// the same plate. Nothing is changed in that case.
    fn reconcile_drivers(&self, drivers: &[DriverDraft]) -> Result<()>;

    /// Insert the initial drivers, once per image.
    ///
    /// Nothing is inserted if this image was seeded before or already has
    /// drivers; emptying the driver set later does not re-arm the seed.
    /// Returns the number of drivers inserted.
    fn seed_drivers(&self, drivers: &[DriverDraft]) -> Result<usize>;

    /// Insert a fuel record and return its id.
    ///
    /// # Errors
    ///
    /// Returns `FleetError::ForeignKeyViolation` if the driver does not exist.
    fn insert_fuel_record(&self, record: &NewFuelRecord) -> Result<i64>;

    /// Get a fuel record by id.
    fn get_fuel_record(&self, id: i64) -> Result<Option<FuelRecord>>;

    /// List a driver's fuel records, newest date first.
    ///
    /// When `range` is given both bounds are inclusive.
    fn query_fuel_records(
        &self,
        driver_id: i64,
        range: Option<&DateRange>,
    ) -> Result<Vec<FuelRecord>>;

    /// Apply a partial update; returns the number of rows affected (0 or 1).
    ///
    /// # Errors
    ///
    /// Returns `FleetError::InvalidInput` if the patch carries no fields.
    fn update_fuel_record(&self, id: i64, patch: &FuelRecordPatch) -> Result<usize>;

    /// Delete a fuel record; returns the number of rows affected.
    fn delete_fuel_record(&self, id: i64) -> Result<usize>;

    /// Check store integrity (page structure and foreign keys).
    fn check_integrity(&self) -> Result<()>;
}
