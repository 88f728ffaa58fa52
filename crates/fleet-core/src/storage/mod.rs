//! Storage layer: the ledger store trait, its data types, and the SQLite backend.

pub mod sqlite;
pub mod traits;
pub mod types;

pub use sqlite::SqliteStore;
pub use traits::LedgerStore;
pub use types::{DateRange, Driver, DriverDraft, FuelRecord, FuelRecordPatch, NewFuelRecord};
