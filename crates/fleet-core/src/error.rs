//! Error types for fleet ledger operations.
//!
//! This module defines the error hierarchy for all core operations.
//! Errors are descriptive at the core level; the CLI layer maps these
//! to exit codes and user-facing messages.

use thiserror::Error;

/// Result type alias for fleet ledger operations.
pub type Result<T> = std::result::Result<T, FleetError>;

/// Core error type for fleet ledger operations.
#[derive(Debug, Error)]
pub enum FleetError {
    /// A driver write would give two drivers the same plate
    #[error("Duplicate plate: {0}")]
    DuplicatePlate(String),

    /// A fuel record references a driver that does not exist
    #[error("Driver {0} does not exist")]
    ForeignKeyViolation(i64),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Restore source is missing or is not a store image
    #[error("Invalid backup: {0}")]
    InvalidBackup(String),

    /// Invalid caller input (empty patch, malformed configuration value)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Storage backend or filesystem error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for FleetError {
    fn from(err: std::io::Error) -> Self {
        FleetError::Storage(err.to_string())
    }
}

impl From<rusqlite::Error> for FleetError {
    fn from(err: rusqlite::Error) -> Self {
        FleetError::Storage(format!("SQLite error: {}", err))
    }
}

impl From<csv::Error> for FleetError {
    fn from(err: csv::Error) -> Self {
        FleetError::Storage(format!("CSV error: {}", err))
    }
}
