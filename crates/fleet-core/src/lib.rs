//! # Fleet Core
//!
//! Core library for Fleet - a fuel and expense ledger for a small vehicle fleet.
//!
//! This crate provides the storage, backup, statistics, and export logic
//! independent of any front end.
//!
//! ## Architecture
//!
//! - **storage**: Ledger store trait and the SQLite implementation
//! - **backup**: Daily, manual, and pre-restore copies of the store image
//! - **prices**: Fuel price lookup read from configuration
//! - **stats**: Distance, consumption, liters, and cost aggregates
//! - **export**: Labeled tables and the CSV writer
//! - **ledger**: Facade tying the pieces together for front ends

pub mod backup;
pub mod error;
pub mod export;
pub mod fs;
pub mod ledger;
pub mod prices;
pub mod stats;
pub mod storage;

pub use backup::{BackupCategory, BackupFile, BackupManager};
pub use error::{FleetError, Result};
pub use export::{CsvDirectoryWriter, ExportComposer, ExportRow, ExportSheet, TabularWriter};
pub use ledger::FleetLedger;
pub use prices::{PriceSource, PriceTable, TomlPriceFile};
pub use stats::{compute_stats, FuelStats};
pub use storage::{LedgerStore, SqliteStore};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
