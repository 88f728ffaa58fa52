//! Fleet CLI - fuel, distance, and expense ledger for a small vehicle fleet
//!
//! This is the command-line interface for Fleet. It drives the
//! `fleet_core` ledger facade and maps its errors to exit codes.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::AppContext;
use crate::cli::{BackupCommands, Cli, Commands, DriverCommands, RecordCommands};
use crate::commands::{drivers, export, maintenance, records, stats};
use crate::errors::{exit_code_for, hint_for};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        if let Some(hint) = hint_for(&e) {
            eprintln!("{}", hint);
        }
        std::process::exit(exit_code_for(&e));
    }
}

/// Logs go to stderr. `FLEET_LOG` wins over `RUST_LOG`; without either the
/// level is `warn`, or `info` for the fleet crates with `--verbose`.
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("FLEET_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| {
            if verbose {
                EnvFilter::new("warn,fleet_core=info,fleet=info")
            } else {
                EnvFilter::new("warn")
            }
        });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let ctx = AppContext::new(cli)?;
    match &cli.command {
        Commands::Drivers(DriverCommands::List { json }) => drivers::handle_list(&ctx, *json),
        Commands::Drivers(DriverCommands::Apply { file, json }) => {
            drivers::handle_apply(&ctx, file, *json)
        }
        Commands::Records(RecordCommands::List(args)) => records::handle_list(&ctx, args),
        Commands::Records(RecordCommands::Add(args)) => records::handle_add(&ctx, args),
        Commands::Records(RecordCommands::Edit(args)) => records::handle_edit(&ctx, args),
        Commands::Records(RecordCommands::Delete { id }) => records::handle_delete(&ctx, *id),
        Commands::Stats(args) => stats::handle_stats(&ctx, args),
        Commands::Backup(BackupCommands::Create) => maintenance::handle_backup_create(&ctx),
        Commands::Backup(BackupCommands::List { json }) => {
            maintenance::handle_backup_list(&ctx, *json)
        }
        Commands::Restore(args) => maintenance::handle_restore(&ctx, args),
        Commands::Export(command) => export::handle_export(&ctx, command),
        Commands::Check => maintenance::handle_check(&ctx),
    }
}
