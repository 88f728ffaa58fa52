//! CLI error types for structured error handling.
//!
//! Errors map to specific exit codes. Failures coming out of `fleet_core`
//! are classified by their [`FleetError`] variant.

use std::fmt;

use fleet_core::FleetError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (driver, record, file)
    NotFound { message: String, hint: String },

    /// Invalid user input
    InvalidInput(String),

    /// Integrity check reported problems
    IntegrityFailed(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => write!(f, "{}\n{}", message, hint),
            CliError::InvalidInput(message) => write!(f, "{}", message),
            CliError::IntegrityFailed(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::IntegrityFailed(_) => exit_codes::INTEGRITY_FAILED,
        }
    }
}

/// Exit code for a core error.
pub fn fleet_exit_code(err: &FleetError) -> i32 {
    match err {
        FleetError::NotFound(_) => exit_codes::NOT_FOUND,
        FleetError::InvalidInput(_) | FleetError::InvalidBackup(_) => exit_codes::INVALID_INPUT,
        FleetError::DuplicatePlate(_) | FleetError::ForeignKeyViolation(_) => exit_codes::CONFLICT,
        FleetError::Storage(_) => exit_codes::FAILURE,
    }
}

/// Exit code for any error reaching `main`.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(cli) = err.downcast_ref::<CliError>() {
        return cli.exit_code();
    }
    if let Some(fleet) = err.downcast_ref::<FleetError>() {
        return fleet_exit_code(fleet);
    }
    exit_codes::FAILURE
}

/// Hint printed under the error message, when one helps.
pub fn hint_for(err: &anyhow::Error) -> Option<&'static str> {
    match err.downcast_ref::<FleetError>()? {
        FleetError::NotFound(message) if message.starts_with("Driver") => {
            Some("Hint: Run `fleet drivers list` to see driver ids.")
        }
        FleetError::NotFound(message) if message.starts_with("Fuel record") => {
            Some("Hint: Run `fleet records list <DRIVER_ID>` to see record ids.")
        }
        FleetError::DuplicatePlate(_) => Some("Hint: Every driver needs a distinct plate."),
        FleetError::InvalidBackup(_) => {
            Some("Hint: Run `fleet backup list` to see restorable files.")
        }
        _ => None,
    }
}
