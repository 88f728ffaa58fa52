use clap::{Args, Parser, Subcommand};

use fleet_core::VERSION;

/// Fleet - fuel, distance, and expense ledger for a small vehicle fleet
#[derive(Parser)]
#[command(name = "fleet")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(short, long, global = true, env = "FLEET_CONFIG")]
    pub config: Option<String>,

    /// Path to the store image (overrides the config file)
    #[arg(short, long, global = true, env = "FLEET_STORE")]
    pub store: Option<String>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Inclusive date window shared by list, stats, and export commands
#[derive(Args, Debug, Clone)]
pub struct RangeArgs {
    /// Start date (YYYY-MM-DD, inclusive)
    #[arg(long, value_name = "DATE", requires = "to")]
    pub from: Option<String>,

    /// End date (YYYY-MM-DD, inclusive)
    #[arg(long, value_name = "DATE", requires = "from")]
    pub to: Option<String>,
}

#[derive(Subcommand)]
pub enum DriverCommands {
    /// List drivers
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace the driver set with the drivers in a JSON file
    ///
    /// Drivers with a known id are updated, the rest are added, and drivers
    /// missing from the file are deleted together with their records.
    Apply {
        /// JSON array of drivers ("-" for stdin)
        #[arg(value_name = "FILE")]
        file: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Arguments for `records list`
#[derive(Args)]
pub struct RecordListArgs {
    /// Driver id
    #[arg(value_name = "DRIVER_ID")]
    pub driver_id: i64,

    #[command(flatten)]
    pub range: RangeArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `records add`
#[derive(Args)]
pub struct RecordAddArgs {
    /// Driver id
    #[arg(long, value_name = "ID")]
    pub driver: i64,

    /// Date (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub date: Option<String>,

    /// Plate (defaults to the driver's plate)
    #[arg(long)]
    pub plate: Option<String>,

    /// Fuel cost
    #[arg(long, default_value_t = 0.0)]
    pub fuel_cost: f64,

    /// Odometer reading
    #[arg(long, visible_alias = "km", default_value_t = 0.0)]
    pub kilometer: f64,

    /// Fuel type (defaults to the driver's fuel type)
    #[arg(long)]
    pub fuel_type: Option<String>,

    /// Granite boxes carried
    #[arg(long, default_value_t = 0.0)]
    pub granit: f64,

    /// Ceramic boxes carried
    #[arg(long, default_value_t = 0.0)]
    pub keramik: f64,

    /// Service description
    #[arg(long, default_value = "")]
    pub service_type: String,

    /// Service cost
    #[arg(long, default_value_t = 0.0)]
    pub service_cost: f64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `records edit`
#[derive(Args)]
pub struct RecordEditArgs {
    /// Record id
    #[arg(value_name = "ID")]
    pub id: i64,

    #[arg(long)]
    pub date: Option<String>,

    #[arg(long)]
    pub fuel_cost: Option<f64>,

    #[arg(long, visible_alias = "km")]
    pub kilometer: Option<f64>,

    #[arg(long)]
    pub fuel_type: Option<String>,

    #[arg(long)]
    pub granit: Option<f64>,

    #[arg(long)]
    pub keramik: Option<f64>,

    #[arg(long)]
    pub service_type: Option<String>,

    #[arg(long)]
    pub service_cost: Option<f64>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum RecordCommands {
    /// List a driver's records, newest first
    List(RecordListArgs),

    /// Add a fuel record
    Add(RecordAddArgs),

    /// Change fields of a record
    Edit(RecordEditArgs),

    /// Delete a record
    Delete {
        /// Record id
        #[arg(value_name = "ID")]
        id: i64,
    },
}

/// Arguments for the `stats` command
#[derive(Args)]
pub struct StatsArgs {
    /// Driver id
    #[arg(value_name = "DRIVER_ID")]
    pub driver_id: i64,

    #[command(flatten)]
    pub range: RangeArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum BackupCommands {
    /// Take a manual backup now
    Create,

    /// List backup files
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Arguments for the `restore` command
#[derive(Args)]
pub struct RestoreArgs {
    /// Backup file to restore (.db)
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum ExportCommands {
    /// Export one driver's records
    Driver {
        /// Driver id
        #[arg(value_name = "DRIVER_ID")]
        driver_id: i64,

        #[command(flatten)]
        range: RangeArgs,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: String,
    },

    /// Export every driver with records, one sheet each
    All {
        #[command(flatten)]
        range: RangeArgs,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: String,
    },
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage drivers
    #[command(subcommand)]
    Drivers(DriverCommands),

    /// Manage fuel records
    #[command(subcommand)]
    Records(RecordCommands),

    /// Show distance, consumption, and cost totals for a driver
    Stats(StatsArgs),

    /// Create or list backups
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Restore the store from a backup file
    Restore(RestoreArgs),

    /// Export records as CSV sheets
    #[command(subcommand)]
    Export(ExportCommands),

    /// Check store integrity
    Check,
}
