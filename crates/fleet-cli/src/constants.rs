//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (storage failures, I/O, anything unclassified)
/// - 2: Misuse of shell command (reserved by shells, used by clap)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// General failure.
    pub const FAILURE: i32 = 1;

    /// Driver, record, or backup not found.
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input, arguments, or backup file.
    pub const INVALID_INPUT: i32 = 4;

    /// Duplicate plate or a record pointing at a missing driver.
    pub const CONFLICT: i32 = 5;

    /// Integrity check failed.
    pub const INTEGRITY_FAILED: i32 = 6;
}
